use nalgebra::{Matrix6, Vector2, Vector3};

use crate::dynamics::state::{Deriv, VesselState};
use crate::physics::current::OceanCurrent;
use crate::physics::hydrodynamics::{coriolis_from_mass, crossflow_drag};
use crate::physics::kinematics::{rzyx, smtrx, tzyx};
use crate::vessel::Otter;

// ---------------------------------------------------------------------------
// 6DOF equations of motion
// ---------------------------------------------------------------------------

/// Compute full 6DOF state derivatives for a propeller speed demand held over
/// the step.
///
/// Forces & moments (body frame):
///   1. Propeller thrust from the saturated actual shaft speeds
///   2. Linear damping on the water-relative velocity, quadratic yaw damping
///   3. Cross-flow drag (strip theory)
///   4. Rigid-body and added-mass Coriolis-centripetal forces
///   5. Hydrostatic restoring in heave, roll and pitch
pub fn derivatives(
    state: &VesselState,
    vessel: &Otter,
    demand: &Vector2<f64>,
    current: &OceanCurrent,
) -> Deriv {
    let eta = state.eta();
    let nu = state.nu();
    let (phi, theta, psi) = (state.attitude.x, state.attitude.y, state.attitude.z);

    // --- Current: relative velocity and its frame rotation ---
    let nu_c = current.body_velocity(psi);
    let dnu_c = current.body_acceleration(psi, nu[5]);
    let nu_r = nu - nu_c;

    // --- Coriolis ---
    let mut crb_cg = Matrix6::zeros();
    crb_cg
        .fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&(vessel.m_total * smtrx(&state.omega)));
    crb_cg
        .fixed_view_mut::<3, 3>(3, 3)
        .copy_from(&(-smtrx(&(vessel.ig * state.omega))));
    let crb = vessel.h_rg.transpose() * crb_cg * vessel.h_rg;

    let mut ca = coriolis_from_mass(&vessel.ma, &nu_r);
    // Munk moment removed; it destabilizes the yaw loop of a short hull
    ca[(5, 0)] = 0.0;
    ca[(5, 1)] = 0.0;
    ca[(0, 5)] = 0.0;
    ca[(1, 5)] = 0.0;
    let c = crb + ca;

    // --- Propellers ---
    let n = vessel.thrusters.saturate(&state.prop_speed);
    let tau = vessel.thrusters.generalized_force(&n);

    // --- Damping ---
    let mut tau_damp = -(vessel.d * nu_r);
    tau_damp[5] -= 10.0 * vessel.d[(5, 5)] * nu_r[5].abs() * nu_r[5];
    let tau_crossflow = crossflow_drag(
        vessel.config.length,
        vessel.config.pontoon_beam,
        vessel.draft,
        &nu_r,
    );

    // --- Newton-Euler ---
    let sum_tau = tau + tau_damp + tau_crossflow - c * nu_r - vessel.g * eta;
    let nu_dot = dnu_c + vessel.m_inv * sum_tau;

    // --- Kinematics ---
    let dpos = rzyx(phi, theta, psi) * state.vel;
    let dattitude = tzyx(phi, theta) * state.omega;

    Deriv {
        dpos,
        dattitude,
        dvel: Vector3::new(nu_dot[0], nu_dot[1], nu_dot[2]),
        domega: Vector3::new(nu_dot[3], nu_dot[4], nu_dot[5]),
        dprop: vessel.thrusters.rate(&n, demand),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vessel::presets;

    fn otter() -> Otter {
        Otter::new(presets::otter()).unwrap()
    }

    #[test]
    fn rest_state_is_an_equilibrium() {
        let v = otter();
        let d = derivatives(&VesselState::zero(), &v, &Vector2::zeros(), &OceanCurrent::calm());
        assert_eq!(d.dpos, Vector3::zeros());
        assert_eq!(d.dattitude, Vector3::zeros());
        assert_eq!(d.dvel, Vector3::zeros());
        assert_eq!(d.domega, Vector3::zeros());
        assert_eq!(d.dprop, Vector2::zeros());
    }

    #[test]
    fn forward_thrust_accelerates_forward() {
        let v = otter();
        let s = VesselState {
            prop_speed: Vector2::new(60.0, 60.0),
            ..VesselState::zero()
        };
        let d = derivatives(&s, &v, &s.prop_speed, &OceanCurrent::calm());
        assert!(d.dvel.x > 0.0, "surge accel {}", d.dvel.x);
        assert!(d.domega.z.abs() < 1e-9, "symmetric thrust should not yaw");
    }

    #[test]
    fn differential_thrust_yaws_to_starboard() {
        let v = otter();
        let s = VesselState {
            prop_speed: Vector2::new(80.0, 20.0),
            ..VesselState::zero()
        };
        let d = derivatives(&s, &v, &s.prop_speed, &OceanCurrent::calm());
        assert!(d.domega.z > 0.0);
    }

    #[test]
    fn current_drags_a_vessel_at_rest() {
        let v = otter();
        // Current flowing north, vessel heading north at rest
        let c = OceanCurrent::new(1.0, 0.0).unwrap();
        let d = derivatives(&VesselState::zero(), &v, &Vector2::zeros(), &c);
        assert!(d.dvel.x > 0.0, "surge accel {}", d.dvel.x);
    }

    #[test]
    fn position_rate_follows_heading() {
        let v = otter();
        let s = VesselState {
            attitude: Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
            vel: Vector3::new(2.0, 0.0, 0.0),
            ..VesselState::zero()
        };
        let d = derivatives(&s, &v, &Vector2::zeros(), &OceanCurrent::calm());
        assert!(d.dpos.x.abs() < 1e-12);
        assert!((d.dpos.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn shaft_speed_lags_demand() {
        let v = otter();
        let demand = Vector2::new(50.0, 50.0);
        let d = derivatives(&VesselState::zero(), &v, &demand, &OceanCurrent::calm());
        assert!((d.dprop[0] - 50.0 / v.config.prop_time_constant).abs() < 1e-9);
    }
}
