use heading_autopilot::dynamics::{ActuatorCommand, VesselState};
use heading_autopilot::gnc::{angle, Controller};
use heading_autopilot::physics::OceanCurrent;
use heading_autopilot::sim;
use heading_autopilot::vessel::{presets, Otter};
use heading_autopilot::SimConfig;

/// Bang-bang heading controller: full moment towards the setpoint outside a
/// deadband, nothing inside it.
struct BangBangController {
    setpoint: f64,
    deadband: f64,
    moment: f64,
    surge_force: f64,
    saturated: bool,
}

impl Controller for BangBangController {
    fn control(&mut self, state: &VesselState, _dt: f64) -> ActuatorCommand {
        let error = angle::normalize_rad(self.setpoint - state.yaw());
        self.saturated = error.abs() > self.deadband;
        let yaw_moment = if self.saturated {
            self.moment * error.signum()
        } else {
            0.0
        };
        ActuatorCommand {
            surge_force: self.surge_force,
            yaw_moment,
        }
    }

    fn saturated(&self) -> bool {
        self.saturated
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() -> anyhow::Result<()> {
    let vessel = Otter::new(presets::otter())?;
    let current = OceanCurrent::new(0.3, 45.0)?;
    let config = SimConfig::default();

    let mut controller = BangBangController {
        setpoint: 60f64.to_radians(),
        deadband: 2f64.to_radians(),
        moment: 40.0,
        surge_force: 200.0,
        saturated: false,
    };

    println!("Simulating {} with {} controller...", vessel.name(), controller.name());
    let record = sim::simulate_with(&vessel, &current, &config, &mut controller)?;

    if let Some(last) = record.last() {
        println!(
            "Final heading: {:.1} deg",
            angle::normalize(last.state.yaw().to_degrees())
        );
        println!("Position: N {:.1} m, E {:.1} m", last.state.pos.x, last.state.pos.y);
        println!("Run time: {:.1} s", last.time);
    }
    println!("Samples: {}", record.len());
    Ok(())
}
