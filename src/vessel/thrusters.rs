use nalgebra::{Matrix2, Vector2, Vector6};

use crate::dynamics::state::ActuatorCommand;
use crate::error::SimError;
use crate::physics::G;

// ---------------------------------------------------------------------------
// Twin fixed propellers: allocation, saturation, thrust
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Thrusters {
    pub k_pos: f64,
    pub k_neg: f64,
    pub l_left: f64,  // m, lever arm (negative = port)
    pub l_right: f64, // m
    pub n_max: f64,   // rad/s
    pub n_min: f64,   // rad/s (negative)
    pub time_constant: f64,
    b_inv: Matrix2<f64>,
}

impl Thrusters {
    pub fn new(
        k_pos: f64,
        k_neg: f64,
        offset: f64,
        bollard_fwd_kgf: f64,
        bollard_rev_kgf: f64,
        time_constant: f64,
    ) -> Result<Self, SimError> {
        let l_left = -offset;
        let l_right = offset;
        // [tau_X, tau_N] = B * [n1|n1|, n2|n2|]
        let b = k_pos * Matrix2::new(1.0, 1.0, -l_left, -l_right);
        let b_inv = b.try_inverse().ok_or_else(|| {
            SimError::model(format!(
                "thruster configuration matrix is singular (propeller offset {offset} m)"
            ))
        })?;

        Ok(Self {
            k_pos,
            k_neg,
            l_left,
            l_right,
            n_max: (0.5 * bollard_fwd_kgf * G / k_pos).sqrt(),
            n_min: -(0.5 * bollard_rev_kgf * G / k_neg).sqrt(),
            time_constant,
            b_inv,
        })
    }

    /// Propeller speed demand for a surge force and yaw moment.
    pub fn allocate(&self, cmd: &ActuatorCommand) -> Vector2<f64> {
        let u = self.b_inv * Vector2::new(cmd.surge_force, cmd.yaw_moment);
        u.map(|ui| ui.signum() * ui.abs().sqrt())
    }

    pub fn saturate(&self, n: &Vector2<f64>) -> Vector2<f64> {
        n.map(|ni| ni.clamp(self.n_min, self.n_max))
    }

    /// Thrust of each propeller for (already saturated) shaft speeds.
    pub fn thrust(&self, n: &Vector2<f64>) -> Vector2<f64> {
        n.map(|ni| {
            if ni > 0.0 {
                self.k_pos * ni * ni.abs()
            } else {
                self.k_neg * ni * ni.abs()
            }
        })
    }

    /// Generalized force [X, 0, 0, 0, 0, N] produced by the propellers.
    pub fn generalized_force(&self, n: &Vector2<f64>) -> Vector6<f64> {
        let t = self.thrust(n);
        Vector6::new(
            t[0] + t[1],
            0.0,
            0.0,
            0.0,
            0.0,
            -self.l_left * t[0] - self.l_right * t[1],
        )
    }

    /// First-order shaft dynamics towards the demand.
    pub fn rate(&self, actual: &Vector2<f64>, demand: &Vector2<f64>) -> Vector2<f64> {
        (demand - actual) / self.time_constant
    }
}
