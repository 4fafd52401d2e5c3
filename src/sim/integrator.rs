use crate::dynamics;
use crate::dynamics::state::{ActuatorCommand, VesselState};
use crate::error::SimError;
use crate::physics::current::OceanCurrent;
use crate::vessel::Otter;

// ---------------------------------------------------------------------------
// 6DOF RK4 integrator with constant actuator command over the step
// ---------------------------------------------------------------------------

/// Single RK4 step. The command is allocated to propeller demands once and held
/// over the four stages.
pub fn rk4_step(
    state: &VesselState,
    vessel: &Otter,
    cmd: &ActuatorCommand,
    current: &OceanCurrent,
    dt: f64,
) -> Result<VesselState, SimError> {
    let demand = vessel.thrusters.saturate(&vessel.thrusters.allocate(cmd));

    let k1 = dynamics::derivatives(state, vessel, &demand, current);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), vessel, &demand, current);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), vessel, &demand, current);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), vessel, &demand, current);

    let next = VesselState {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        attitude: state.attitude
            + (k1.dattitude + 2.0 * k2.dattitude + 2.0 * k3.dattitude + k4.dattitude)
                * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
        omega: state.omega
            + (k1.domega + 2.0 * k2.domega + 2.0 * k3.domega + k4.domega) * (dt / 6.0),
        prop_speed: state.prop_speed
            + (k1.dprop + 2.0 * k2.dprop + 2.0 * k3.dprop + k4.dprop) * (dt / 6.0),
    };

    if !next.is_finite() {
        return Err(SimError::model(format!(
            "state became non-finite at t = {:.3} s",
            next.time
        )));
    }
    Ok(next)
}
