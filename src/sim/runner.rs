use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::config::{ControllerConfig, CurrentConfig, SimConfig};
use crate::dynamics::state::VesselState;
use crate::error::SimError;
use crate::gnc::{Controller, HeadingAutopilot};
use crate::physics::current::OceanCurrent;
use crate::vessel::{Otter, VesselConfig};
use super::integrator::rk4_step;
use super::record::{Sample, SimulationRecord};

// ---------------------------------------------------------------------------
// Full run from configuration
// ---------------------------------------------------------------------------

/// Build vessel, autopilot and current from their configs and run once from
/// the all-zero state. Every configuration check happens before the first step.
pub fn run(
    vessel: &VesselConfig,
    controller: &ControllerConfig,
    current: &CurrentConfig,
    config: &SimConfig,
) -> Result<SimulationRecord, SimError> {
    config.validate()?;
    let current = OceanCurrent::from_config(current)?;
    let mut autopilot = HeadingAutopilot::from_config(controller)?;
    let vessel = Otter::new(vessel.clone())?;
    simulate_with(&vessel, &current, config, &mut autopilot)
}

/// Simulate with any controller (the controller is reset first).
pub fn simulate_with(
    vessel: &Otter,
    current: &OceanCurrent,
    config: &SimConfig,
    controller: &mut dyn Controller,
) -> Result<SimulationRecord, SimError> {
    let never = AtomicBool::new(false);
    simulate_cancellable(vessel, current, config, controller, &never)
}

/// Same as [`simulate_with`], checking `cancel` between steps. A cancelled run
/// returns `Aborted` with cause `Cancelled` and the samples logged so far.
///
/// The controller is called once per sample, so the final sample carries the
/// command computed from the final state. That command is logged but never
/// applied, and it counts towards the saturation total like any other.
pub fn simulate_cancellable(
    vessel: &Otter,
    current: &OceanCurrent,
    config: &SimConfig,
    controller: &mut dyn Controller,
    cancel: &AtomicBool,
) -> Result<SimulationRecord, SimError> {
    config.validate()?;
    controller.reset();

    let steps = config.steps();
    let mut record = SimulationRecord::with_capacity((steps + 1).min(200_000));
    let mut state = VesselState::zero();
    let mut saturated_steps = 0usize;

    debug!(
        vessel = vessel.name(),
        controller = controller.name(),
        dt = config.dt,
        steps,
        current_speed = current.speed(),
        "run started"
    );

    for i in 0..=steps {
        let time = i as f64 * config.dt;
        if cancel.load(Ordering::Relaxed) {
            return Err(aborted(time, record, SimError::Cancelled));
        }

        state.time = time;
        // Also evaluated for the last sample, which is never integrated.
        let command = controller.control(&state, config.dt);
        if controller.saturated() {
            saturated_steps += 1;
        }
        record.push(Sample {
            time,
            state,
            command,
        });

        if i == steps {
            break;
        }
        state = match rk4_step(&state, vessel, &command, current, config.dt) {
            Ok(next) => next,
            Err(e) => return Err(aborted(time, record, e)),
        };
    }

    if saturated_steps > 0 {
        warn!(
            saturated_steps,
            controller = controller.name(),
            "controller output hit its limit"
        );
    }
    info!(samples = record.len(), "run completed");
    Ok(record)
}

fn aborted(time: f64, partial: SimulationRecord, cause: SimError) -> SimError {
    warn!(time, samples = partial.len(), error = %cause, "run aborted");
    SimError::Aborted {
        time,
        partial,
        cause: Box::new(cause),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::ActuatorCommand;
    use crate::gnc::angle;
    use crate::vessel::presets;

    fn default_run() -> SimulationRecord {
        run(
            &presets::otter(),
            &ControllerConfig::default(),
            &CurrentConfig::default(),
            &SimConfig::default(),
        )
        .unwrap()
    }

    fn final_heading_deg(rec: &SimulationRecord) -> f64 {
        angle::normalize(rec.last().unwrap().state.yaw().to_degrees())
    }

    #[test]
    fn default_run_has_3001_samples() {
        let rec = default_run();
        assert_eq!(rec.len(), 3001);
        assert_eq!(rec.first().unwrap().time, 0.0);
        assert!((rec.last().unwrap().time - 60.0).abs() < 1e-9);
    }

    #[test]
    fn heading_converges_to_setpoint() {
        let rec = default_run();
        let psi = final_heading_deg(&rec);
        assert!((psi - 60.0).abs() < 3.0, "final heading {:.2} deg", psi);
        // Turned the right way from the start
        let early = angle::normalize(rec.samples()[100].state.yaw().to_degrees());
        assert!(early > 0.0);
    }

    #[test]
    fn negative_setpoint_turns_to_port() {
        let controller = ControllerConfig {
            setpoint_deg: -90.0,
            ..Default::default()
        };
        let rec = run(
            &presets::otter(),
            &controller,
            &CurrentConfig::default(),
            &SimConfig::default(),
        )
        .unwrap();
        let psi = final_heading_deg(&rec);
        assert!((psi + 90.0).abs() < 3.0, "final heading {:.2} deg", psi);
    }

    #[test]
    fn runs_are_bit_identical() {
        assert_eq!(default_run(), default_run());
    }

    #[test]
    fn idle_vessel_stays_put() {
        let controller = ControllerConfig {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            tau_x: 0.0,
            ..Default::default()
        };
        let rec = run(
            &presets::otter(),
            &controller,
            &CurrentConfig::default(),
            &SimConfig::default(),
        )
        .unwrap();
        assert_eq!(rec.len(), 3001);
        for s in &rec {
            assert_eq!(s.state.yaw(), 0.0);
            assert_eq!(s.state.pos.x, 0.0);
            assert_eq!(s.state.pos.y, 0.0);
        }
    }

    #[test]
    fn current_pushes_the_track() {
        let calm = default_run();
        let east_current = CurrentConfig {
            speed: 0.5,
            direction_deg: 90.0,
        };
        let drifted = run(
            &presets::otter(),
            &ControllerConfig::default(),
            &east_current,
            &SimConfig::default(),
        )
        .unwrap();
        let e_calm = calm.last().unwrap().state.pos.y;
        let e_drift = drifted.last().unwrap().state.pos.y;
        assert!(e_drift > e_calm, "east {:.1} vs {:.1}", e_drift, e_calm);
    }

    #[test]
    fn negative_current_rejected_before_first_step() {
        let err = run(
            &presets::otter(),
            &ControllerConfig::default(),
            &CurrentConfig {
                speed: -0.1,
                direction_deg: 0.0,
            },
            &SimConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
        assert!(err.partial().is_none());
    }

    #[test]
    fn bad_step_size_rejected() {
        let bad = [
            SimConfig { dt: 0.0, duration: 60.0 },
            SimConfig { dt: -0.02, duration: 60.0 },
            SimConfig { dt: 0.02, duration: 0.01 },
        ];
        for config in bad {
            let err = run(
                &presets::otter(),
                &ControllerConfig::default(),
                &CurrentConfig::default(),
                &config,
            )
            .unwrap_err();
            assert!(err.is_invalid_configuration(), "{:?}", config);
        }
    }

    #[test]
    fn singular_vessel_is_a_model_error() {
        let vessel = VesselConfig {
            mass: 0.0,
            payload_mass: 0.0,
            ..presets::otter()
        };
        let err = run(
            &vessel,
            &ControllerConfig::default(),
            &CurrentConfig::default(),
            &SimConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_model_configuration());
    }

    /// Emits a NaN moment at a fixed step to force a numerical failure.
    struct FaultyController {
        calls: usize,
        fail_at: usize,
    }

    impl Controller for FaultyController {
        fn control(&mut self, _state: &VesselState, _dt: f64) -> ActuatorCommand {
            let yaw_moment = if self.calls == self.fail_at { f64::NAN } else { 0.0 };
            self.calls += 1;
            ActuatorCommand {
                surge_force: 50.0,
                yaw_moment,
            }
        }

        fn reset(&mut self) {
            self.calls = 0;
        }
    }

    #[test]
    fn mid_run_failure_returns_partial_record() {
        let vessel = Otter::new(presets::otter()).unwrap();
        let mut ctrl = FaultyController { calls: 0, fail_at: 10 };
        let err = simulate_with(
            &vessel,
            &OceanCurrent::calm(),
            &SimConfig::default(),
            &mut ctrl,
        )
        .unwrap_err();
        assert!(err.is_model_configuration());
        let partial = err.partial().unwrap();
        assert_eq!(partial.len(), 11);
        assert!(partial.samples()[..10].iter().all(|s| s.state.is_finite()));
    }

    #[test]
    fn oversized_step_count_rejected_before_allocation() {
        let err = run(
            &presets::otter(),
            &ControllerConfig::default(),
            &CurrentConfig::default(),
            &SimConfig { dt: 1e-300, duration: 60.0 },
        )
        .unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.partial().is_none());
    }

    /// Counts calls and reports the call index as the yaw moment.
    struct CountingController {
        calls: usize,
    }

    impl Controller for CountingController {
        fn control(&mut self, _state: &VesselState, _dt: f64) -> ActuatorCommand {
            self.calls += 1;
            ActuatorCommand {
                surge_force: 0.0,
                yaw_moment: self.calls as f64 * 1e-3,
            }
        }

        fn reset(&mut self) {
            self.calls = 0;
        }
    }

    #[test]
    fn final_command_is_logged_once_per_sample() {
        let vessel = Otter::new(presets::otter()).unwrap();
        let config = SimConfig { dt: 0.02, duration: 1.0 };
        let mut ctrl = CountingController { calls: 7 };
        let rec = simulate_with(&vessel, &OceanCurrent::calm(), &config, &mut ctrl).unwrap();
        assert_eq!(rec.len(), 51);
        assert_eq!(ctrl.calls, rec.len());
        let last = rec.last().unwrap();
        assert_eq!(last.command.yaw_moment, 51.0 * 1e-3);
        // The last command was never integrated: the final state is the
        // result of the 50th command only.
        let prev = &rec.samples()[49];
        let stepped = rk4_step(&prev.state, &vessel, &prev.command, &OceanCurrent::calm(), 0.02)
            .unwrap();
        assert_eq!(stepped.omega, last.state.omega);
        assert_eq!(stepped.pos, last.state.pos);
    }

    #[test]
    fn cancelled_before_start() {
        let vessel = Otter::new(presets::otter()).unwrap();
        let mut ap = HeadingAutopilot::from_config(&ControllerConfig::default()).unwrap();
        let cancel = AtomicBool::new(true);
        let err = simulate_cancellable(
            &vessel,
            &OceanCurrent::calm(),
            &SimConfig::default(),
            &mut ap,
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err.root(), SimError::Cancelled));
        assert!(err.partial().unwrap().is_empty());
    }

    #[test]
    fn moment_limit_is_honoured_in_the_record() {
        let controller = ControllerConfig {
            moment_limit: Some(30.0),
            ..Default::default()
        };
        let rec = run(
            &presets::otter(),
            &controller,
            &CurrentConfig::default(),
            &SimConfig { dt: 0.02, duration: 10.0 },
        )
        .unwrap();
        assert!(rec.iter().all(|s| s.command.yaw_moment.abs() <= 30.0));
        assert_eq!(rec.samples()[0].command.yaw_moment, 30.0);
    }
}
