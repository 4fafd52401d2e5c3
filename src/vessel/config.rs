use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, SimError};

pub const KNOT: f64 = 0.5144; // m/s

// ---------------------------------------------------------------------------
// Vessel physical parameters
// ---------------------------------------------------------------------------

/// Physical description of a twin-hull USV. Defaults describe the Otter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    pub name: String,
    pub mass: f64,              // kg, hull only
    pub payload_mass: f64,      // kg
    pub payload_pos: [f64; 3],  // m, body frame, relative to the body origin
    pub hull_cg: [f64; 3],      // m, hull-only centre of gravity
    pub length: f64,            // m
    pub beam: f64,              // m, overall
    pub pontoon_beam: f64,      // m, one pontoon
    pub pontoon_offset: f64,    // m, centreline to pontoon waterline centroid
    pub waterline_coeff: f64,   // pontoon waterline area coefficient
    pub block_coeff: f64,       // pontoon block coefficient
    pub lcf: f64,               // m, longitudinal centre of flotation
    pub yaw_time_constant: f64, // s
    pub max_speed: f64,         // m/s
    pub prop_time_constant: f64, // s
    pub k_pos: f64,             // positive bollard constant, one propeller
    pub k_neg: f64,             // negative bollard constant, one propeller
    pub bollard_fwd_kgf: f64,   // both propellers, forward
    pub bollard_rev_kgf: f64,   // both propellers, reverse
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            name: "Otter USV".into(),
            mass: 55.0,
            payload_mass: 25.0,
            payload_pos: [0.05, 0.0, -0.35],
            hull_cg: [0.2, 0.0, -0.2],
            length: 2.0,
            beam: 1.08,
            pontoon_beam: 0.25,
            pontoon_offset: 0.395,
            waterline_coeff: 0.75,
            block_coeff: 0.4,
            lcf: -0.2,
            yaw_time_constant: 1.0,
            max_speed: 6.0 * KNOT,
            prop_time_constant: 0.1,
            k_pos: 0.02216 / 2.0,
            k_neg: 0.01289 / 2.0,
            bollard_fwd_kgf: 24.4,
            bollard_rev_kgf: 13.6,
        }
    }
}

impl VesselConfig {
    /// Range checks. Whether the resulting mass matrix is invertible is decided
    /// when the model is built.
    pub fn validate(&self) -> Result<(), SimError> {
        let scalars = [
            ("mass", self.mass),
            ("payload_mass", self.payload_mass),
            ("length", self.length),
            ("beam", self.beam),
            ("pontoon_beam", self.pontoon_beam),
            ("pontoon_offset", self.pontoon_offset),
            ("waterline_coeff", self.waterline_coeff),
            ("block_coeff", self.block_coeff),
            ("lcf", self.lcf),
            ("yaw_time_constant", self.yaw_time_constant),
            ("max_speed", self.max_speed),
            ("prop_time_constant", self.prop_time_constant),
            ("k_pos", self.k_pos),
            ("k_neg", self.k_neg),
            ("bollard_fwd_kgf", self.bollard_fwd_kgf),
            ("bollard_rev_kgf", self.bollard_rev_kgf),
        ];
        for (name, v) in scalars {
            ensure_finite(name, v)?;
        }
        for (i, v) in self.payload_pos.iter().chain(self.hull_cg.iter()).enumerate() {
            ensure_finite(if i < 3 { "payload_pos" } else { "hull_cg" }, *v)?;
        }

        for (name, v) in [
            ("mass", self.mass),
            ("payload_mass", self.payload_mass),
            ("pontoon_offset", self.pontoon_offset),
        ] {
            if v < 0.0 {
                return Err(SimError::invalid(format!("{name} must be non-negative, got {v}")));
            }
        }
        for (name, v) in [
            ("length", self.length),
            ("beam", self.beam),
            ("pontoon_beam", self.pontoon_beam),
            ("waterline_coeff", self.waterline_coeff),
            ("block_coeff", self.block_coeff),
            ("yaw_time_constant", self.yaw_time_constant),
            ("max_speed", self.max_speed),
            ("prop_time_constant", self.prop_time_constant),
            ("k_pos", self.k_pos),
            ("k_neg", self.k_neg),
            ("bollard_fwd_kgf", self.bollard_fwd_kgf),
            ("bollard_rev_kgf", self.bollard_rev_kgf),
        ] {
            if v <= 0.0 {
                return Err(SimError::invalid(format!("{name} must be positive, got {v}")));
            }
        }
        if self.waterline_coeff > 1.0 || self.block_coeff > 1.0 {
            return Err(SimError::invalid("hull form coefficients must not exceed 1"));
        }
        Ok(())
    }

    pub fn total_mass(&self) -> f64 {
        self.mass + self.payload_mass
    }
}
