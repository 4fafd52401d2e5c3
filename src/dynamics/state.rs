use nalgebra::{Vector2, Vector3, Vector6};

// ---------------------------------------------------------------------------
// 6DOF vessel state: NED pose, body velocities, propeller speeds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VesselState {
    pub time: f64,
    pub pos: Vector3<f64>,      // m, NED [north, east, down]
    pub attitude: Vector3<f64>, // rad [roll, pitch, yaw], yaw left unwrapped
    pub vel: Vector3<f64>,      // m/s, body [surge, sway, heave]
    pub omega: Vector3<f64>,    // rad/s, body [p, q, r]
    pub prop_speed: Vector2<f64>, // rad/s, actual shaft speeds [left, right]
}

impl VesselState {
    /// Canonical initial condition of every run.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn apply(&self, d: &Deriv, dt: f64) -> VesselState {
        VesselState {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            attitude: self.attitude + d.dattitude * dt,
            vel: self.vel + d.dvel * dt,
            omega: self.omega + d.domega * dt,
            prop_speed: self.prop_speed + d.dprop * dt,
        }
    }

    pub fn yaw(&self) -> f64 {
        self.attitude.z
    }

    pub fn yaw_rate(&self) -> f64 {
        self.omega.z
    }

    /// Generalized position eta = [n, e, d, phi, theta, psi].
    pub fn eta(&self) -> Vector6<f64> {
        Vector6::new(
            self.pos.x,
            self.pos.y,
            self.pos.z,
            self.attitude.x,
            self.attitude.y,
            self.attitude.z,
        )
    }

    /// Generalized velocity nu = [u, v, w, p, q, r].
    pub fn nu(&self) -> Vector6<f64> {
        Vector6::new(
            self.vel.x,
            self.vel.y,
            self.vel.z,
            self.omega.x,
            self.omega.y,
            self.omega.z,
        )
    }

    /// Speed over ground in the horizontal plane.
    pub fn speed(&self) -> f64 {
        (self.vel.x.powi(2) + self.vel.y.powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().all(|v| v.is_finite())
            && self.attitude.iter().all(|v| v.is_finite())
            && self.vel.iter().all(|v| v.is_finite())
            && self.omega.iter().all(|v| v.is_finite())
            && self.prop_speed.iter().all(|v| v.is_finite())
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub dattitude: Vector3<f64>,
    pub dvel: Vector3<f64>,
    pub domega: Vector3<f64>,
    pub dprop: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// Actuator command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuatorCommand {
    pub surge_force: f64, // N, pilot thrust
    pub yaw_moment: f64,  // N·m, autopilot output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_scales_each_component() {
        let s = VesselState::zero();
        let d = Deriv {
            dpos: Vector3::new(1.0, 0.0, 0.0),
            dattitude: Vector3::new(0.0, 0.0, 0.5),
            dvel: Vector3::new(2.0, 0.0, 0.0),
            domega: Vector3::zeros(),
            dprop: Vector2::new(10.0, -10.0),
        };
        let next = s.apply(&d, 0.1);
        assert_eq!(next.time, 0.1);
        assert_eq!(next.pos.x, 0.1);
        assert_eq!(next.yaw(), 0.05);
        assert_eq!(next.vel.x, 0.2);
        assert_eq!(next.prop_speed, Vector2::new(1.0, -1.0));
    }

    #[test]
    fn nan_is_detected() {
        let mut s = VesselState::zero();
        assert!(s.is_finite());
        s.omega.z = f64::NAN;
        assert!(!s.is_finite());
    }
}
