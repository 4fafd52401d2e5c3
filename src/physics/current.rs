use nalgebra::Vector6;

use crate::config::CurrentConfig;
use crate::error::SimError;

// ---------------------------------------------------------------------------
// Uniform ocean current
// ---------------------------------------------------------------------------

/// Constant, irrotational current. Its velocity is fixed in the NED frame, so
/// seen from the hull it rotates with the heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OceanCurrent {
    speed: f64,     // m/s
    direction: f64, // rad, direction the water flows towards
}

impl OceanCurrent {
    pub fn new(speed: f64, direction_deg: f64) -> Result<Self, SimError> {
        Self::from_config(&CurrentConfig {
            speed,
            direction_deg,
        })
    }

    pub fn from_config(config: &CurrentConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            speed: config.speed,
            direction: config.direction_deg.to_radians(),
        })
    }

    pub fn calm() -> Self {
        Self {
            speed: 0.0,
            direction: 0.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_calm(&self) -> bool {
        self.speed == 0.0
    }

    /// Current velocity in the body frame at heading `psi`, as a 6DOF
    /// velocity offset [u_c, v_c, 0, 0, 0, 0].
    pub fn body_velocity(&self, psi: f64) -> Vector6<f64> {
        if self.is_calm() {
            return Vector6::zeros();
        }
        let rel = self.direction - psi;
        Vector6::new(
            self.speed * rel.cos(),
            self.speed * rel.sin(),
            0.0,
            0.0,
            0.0,
            0.0,
        )
    }

    /// Body-frame time derivative of [`Self::body_velocity`] at yaw rate `r`.
    pub fn body_acceleration(&self, psi: f64, r: f64) -> Vector6<f64> {
        if self.is_calm() {
            return Vector6::zeros();
        }
        let nu_c = self.body_velocity(psi);
        Vector6::new(r * nu_c[1], -r * nu_c[0], 0.0, 0.0, 0.0, 0.0)
    }
}

impl Default for OceanCurrent {
    fn default() -> Self {
        Self::calm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_speed_ignores_direction() {
        let c = OceanCurrent::new(0.0, 123.4).unwrap();
        assert_eq!(c.body_velocity(0.7), Vector6::zeros());
        assert_eq!(c.body_acceleration(0.7, 0.3), Vector6::zeros());
    }

    #[test]
    fn head_current_is_negative_surge_offset() {
        // Flowing south while heading north
        let c = OceanCurrent::new(0.5, 180.0).unwrap();
        let nu_c = c.body_velocity(0.0);
        assert_relative_eq!(nu_c[0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(nu_c[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn beam_current_rotates_with_heading() {
        let c = OceanCurrent::new(1.0, 90.0).unwrap();
        assert_relative_eq!(c.body_velocity(0.0)[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            c.body_velocity(90.0_f64.to_radians())[0],
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn negative_speed_rejected() {
        let err = OceanCurrent::new(-1.0, 0.0).unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn non_finite_direction_rejected() {
        assert!(OceanCurrent::new(1.0, f64::NAN).is_err());
    }
}
