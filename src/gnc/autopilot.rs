use crate::config::ControllerConfig;
use crate::dynamics::state::{ActuatorCommand, VesselState};
use crate::error::SimError;
use super::angle;
use super::pid::Pid;

// ---------------------------------------------------------------------------
// Heading autopilot: constant surge thrust + PID on yaw
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HeadingAutopilot {
    pub pid: Pid,
    setpoint: f64, // rad, in (-pi, pi]
    pub tau_x: f64,
}

impl HeadingAutopilot {
    /// Build a fresh autopilot; the integral always starts at zero.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, SimError> {
        let config = config.validated()?;
        Ok(Self {
            pid: Pid::new(config.kp, config.ki, config.kd)
                .with_limit(config.moment_limit, config.anti_windup),
            setpoint: config.setpoint_deg.to_radians(),
            tau_x: config.tau_x,
        })
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Wrap-safe yaw error for a measured heading, rad.
    pub fn error(&self, current_yaw: f64) -> f64 {
        angle::heading_error(self.setpoint, current_yaw)
    }

    /// Commanded yaw moment for the measured heading and yaw rate.
    pub fn step(&mut self, current_yaw: f64, current_yaw_rate: f64, dt: f64) -> f64 {
        let error = self.error(current_yaw);
        self.pid.update(error, current_yaw_rate, dt)
    }
}

impl super::Controller for HeadingAutopilot {
    fn control(&mut self, state: &VesselState, dt: f64) -> ActuatorCommand {
        ActuatorCommand {
            surge_force: self.tau_x,
            yaw_moment: self.step(state.yaw(), state.yaw_rate(), dt),
        }
    }

    fn reset(&mut self) {
        self.pid.reset();
    }

    fn saturated(&self) -> bool {
        self.pid.is_saturated()
    }

    fn name(&self) -> &str {
        "HeadingAutopilot"
    }
}
