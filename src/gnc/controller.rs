use crate::dynamics::state::{ActuatorCommand, VesselState};

/// Trait for vessel controllers.
///
/// Implement this to create custom controllers that can be plugged into the
/// simulation loop.
pub trait Controller {
    /// Compute the actuator command for the current state.
    fn control(&mut self, state: &VesselState, dt: f64) -> ActuatorCommand;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Whether the last command hit an output limit.
    fn saturated(&self) -> bool {
        false
    }

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
