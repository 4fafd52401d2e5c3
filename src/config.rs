use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, SimError};
use crate::gnc::angle;
use crate::vessel::VesselConfig;

// ---------------------------------------------------------------------------
// Fixed simulation constants
// ---------------------------------------------------------------------------

pub const SAMPLE_TIME: f64 = 0.02; // s
pub const DURATION: f64 = 60.0; // s

/// Upper bound on integration steps in one run.
pub const MAX_STEPS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,       // s
    pub duration: f64, // s
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: SAMPLE_TIME,
            duration: DURATION,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_finite("dt", self.dt)?;
        ensure_finite("duration", self.duration)?;
        if self.dt <= 0.0 {
            return Err(SimError::invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if self.duration < self.dt {
            return Err(SimError::invalid(format!(
                "duration ({} s) is shorter than one step ({} s)",
                self.duration, self.dt
            )));
        }
        let steps = (self.duration / self.dt).round();
        if steps > MAX_STEPS as f64 {
            return Err(SimError::invalid(format!(
                "{steps:.3e} steps requested, at most {MAX_STEPS} allowed"
            )));
        }
        Ok(())
    }

    /// Number of integration steps; the record holds one more sample than this.
    pub fn steps(&self) -> usize {
        (self.duration / self.dt).round() as usize
    }
}

// ---------------------------------------------------------------------------
// Controller config
// ---------------------------------------------------------------------------

/// How the integral behaves while the yaw-moment limit is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiWindup {
    /// Integrate every step, clamped or not.
    #[default]
    None,
    /// Hold the integral while saturated and the error drives further into the limit.
    Conditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub setpoint_deg: f64,          // normalized to (-180, 180] on validation
    pub tau_x: f64,                 // N, constant surge force
    pub moment_limit: Option<f64>,  // N·m, symmetric clamp on the yaw moment
    pub anti_windup: AntiWindup,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kp: 200.0,
            ki: 0.0,
            kd: 200.0,
            setpoint_deg: 60.0,
            tau_x: 200.0,
            moment_limit: None,
            anti_windup: AntiWindup::None,
        }
    }
}

impl ControllerConfig {
    /// Check ranges and return a copy with the setpoint normalized.
    pub fn validated(&self) -> Result<Self, SimError> {
        ensure_finite("kp", self.kp)?;
        ensure_finite("ki", self.ki)?;
        ensure_finite("kd", self.kd)?;
        ensure_finite("setpoint", self.setpoint_deg)?;
        ensure_finite("tau_x", self.tau_x)?;
        if let Some(limit) = self.moment_limit {
            ensure_finite("moment_limit", limit)?;
            if limit <= 0.0 {
                return Err(SimError::invalid(format!(
                    "moment_limit must be positive, got {limit}"
                )));
            }
        }
        Ok(Self {
            setpoint_deg: angle::normalize(self.setpoint_deg),
            ..*self
        })
    }
}

// ---------------------------------------------------------------------------
// Disturbance config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConfig {
    pub speed: f64,         // m/s, >= 0
    pub direction_deg: f64, // direction the current flows towards, from north
}

impl CurrentConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        ensure_finite("current speed", self.speed)?;
        ensure_finite("current direction", self.direction_deg)?;
        if self.speed < 0.0 {
            return Err(SimError::invalid(format!(
                "current speed must be non-negative, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Operator parameter set
// ---------------------------------------------------------------------------

/// The values an operator can change between runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub tau_x: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub setpoint_deg: f64,
    pub current_speed: f64,
    pub current_direction_deg: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tau_x: 200.0,
            kp: 200.0,
            ki: 0.0,
            kd: 200.0,
            setpoint_deg: 60.0,
            current_speed: 0.0,
            current_direction_deg: 0.0,
        }
    }
}

impl Params {
    /// Validate and split into fresh controller and disturbance configs.
    pub fn to_configs(&self) -> Result<(ControllerConfig, CurrentConfig), SimError> {
        let controller = ControllerConfig {
            kp: self.kp,
            ki: self.ki,
            kd: self.kd,
            setpoint_deg: self.setpoint_deg,
            tau_x: self.tau_x,
            ..ControllerConfig::default()
        }
        .validated()?;
        let current = CurrentConfig {
            speed: self.current_speed,
            direction_deg: self.current_direction_deg,
        };
        current.validate()?;
        Ok((controller, current))
    }
}

// ---------------------------------------------------------------------------
// Scenario file
// ---------------------------------------------------------------------------

/// Layout of a TOML scenario file: `[params]`, `[vessel]` and `[sim]` tables,
/// each optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub params: Params,
    pub vessel: VesselConfig,
    pub sim: SimConfig,
}

impl ScenarioFile {
    pub fn from_toml(text: &str) -> Result<Self, SimError> {
        toml::from_str(text).map_err(|e| SimError::invalid(format!("scenario file: {e}")))
    }
}
