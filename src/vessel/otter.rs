use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use super::config::VesselConfig;
use super::thrusters::Thrusters;
use crate::error::SimError;
use crate::physics::hydrodynamics::RHO_WATER;
use crate::physics::kinematics::{hmtrx, smtrx};
use crate::physics::G;

// Ratio of largest to smallest singular value above which M is treated as singular.
const MAX_CONDITION: f64 = 1e10;

// ---------------------------------------------------------------------------
// Otter-class twin-hull USV: assembled system matrices
// ---------------------------------------------------------------------------

/// A vessel ready to integrate: every matrix the equations of motion need,
/// derived once from a [`VesselConfig`].
#[derive(Debug, Clone)]
pub struct Otter {
    pub config: VesselConfig,
    pub m_total: f64,
    pub draft: f64,           // m
    pub ig: Matrix3<f64>,     // inertia dyadic about the body origin
    pub h_rg: Matrix6<f64>,
    pub ma: Matrix6<f64>,     // added mass
    pub m: Matrix6<f64>,      // rigid body + added mass
    pub m_inv: Matrix6<f64>,
    pub g: Matrix6<f64>,      // hydrostatic restoring
    pub d: Matrix6<f64>,      // linear damping
    pub thrusters: Thrusters,
}

impl Otter {
    pub fn new(config: VesselConfig) -> Result<Self, SimError> {
        config.validate()?;

        let m = config.mass;
        let mp = config.payload_mass;
        let m_total = config.total_mass();
        if m_total <= 0.0 {
            return Err(SimError::model("total mass is zero, the mass matrix is singular"));
        }

        // --- Mass properties ---
        let rp = Vector3::from(config.payload_pos);
        let rg = (m * Vector3::from(config.hull_cg) + mp * rp) / m_total;
        let s_rg = smtrx(&rg);
        let s_rp = smtrx(&rp);
        let h_rg = hmtrx(&rg);

        let r44 = 0.4 * config.beam; // radii of gyration
        let r55 = 0.25 * config.length;
        let r66 = 0.25 * config.length;
        let ig_cg = m * Matrix3::from_diagonal(&Vector3::new(r44 * r44, r55 * r55, r66 * r66));
        let ig = ig_cg - m * s_rg * s_rg - mp * s_rp * s_rp;

        let mut mrb_cg = Matrix6::zeros();
        mrb_cg
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(m_total * Matrix3::identity()));
        mrb_cg.fixed_view_mut::<3, 3>(3, 3).copy_from(&ig);
        let mrb = h_rg.transpose() * mrb_cg * h_rg;

        let ma = Matrix6::from_diagonal(&Vector6::new(
            0.1 * m,
            1.5 * m,
            1.0 * m,
            0.2 * ig[(0, 0)],
            0.8 * ig[(1, 1)],
            1.7 * ig[(2, 2)],
        ));
        let m_sys = mrb + ma;
        let m_inv = invert_mass_matrix(&m_sys)?;

        // --- Hydrostatics (one pontoon, mirrored) ---
        let nabla = m_total / RHO_WATER;
        let draft = nabla / (2.0 * config.block_coeff * config.pontoon_beam * config.length);
        let cw = config.waterline_coeff;
        let aw_pont = cw * config.length * config.pontoon_beam;
        let y_pont = config.pontoon_offset;
        let i_t = 2.0 / 12.0
            * config.length
            * config.pontoon_beam.powi(3)
            * (6.0 * cw.powi(3) / ((1.0 + cw) * (1.0 + 2.0 * cw)))
            + 2.0 * aw_pont * y_pont * y_pont;
        let i_l = 0.8 * 2.0 / 12.0 * config.pontoon_beam * config.length.powi(3);
        let kb = (2.5 * draft - 0.5 * nabla / (config.length * config.pontoon_beam)) / 3.0;
        let kg = draft - rg.z;
        let gm_t = kb + i_t / nabla - kg;
        let gm_l = kb + i_l / nabla - kg;

        let g33 = RHO_WATER * G * 2.0 * aw_pont;
        let g44 = RHO_WATER * G * nabla * gm_t;
        let g55 = RHO_WATER * G * nabla * gm_l;
        let g_cf = Matrix6::from_diagonal(&Vector6::new(0.0, 0.0, g33, g44, g55, 0.0));
        let h_cf = hmtrx(&Vector3::new(config.lcf, 0.0, 0.0));
        let g = h_cf.transpose() * g_cf * h_cf;

        // --- Linear damping ---
        let w3 = (g33 / m_sys[(2, 2)]).max(0.0).sqrt();
        let w4 = (g44 / m_sys[(3, 3)]).max(0.0).sqrt();
        let w5 = (g55 / m_sys[(4, 4)]).max(0.0).sqrt();
        let d = Matrix6::from_diagonal(&Vector6::new(
            config.bollard_fwd_kgf * G / config.max_speed,
            0.0,
            2.0 * 0.3 * w3 * m_sys[(2, 2)],
            2.0 * 0.2 * w4 * m_sys[(3, 3)],
            2.0 * 0.4 * w5 * m_sys[(4, 4)],
            m_sys[(5, 5)] / config.yaw_time_constant,
        ));

        let thrusters = Thrusters::new(
            config.k_pos,
            config.k_neg,
            config.pontoon_offset,
            config.bollard_fwd_kgf,
            config.bollard_rev_kgf,
            config.prop_time_constant,
        )?;

        Ok(Self {
            config,
            m_total,
            draft,
            ig,
            h_rg,
            ma,
            m: m_sys,
            m_inv,
            g,
            d,
            thrusters,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }
}

fn invert_mass_matrix(m: &Matrix6<f64>) -> Result<Matrix6<f64>, SimError> {
    if m.iter().any(|v| !v.is_finite()) {
        return Err(SimError::model("mass matrix has non-finite entries"));
    }
    let sv = m.singular_values();
    let (lo, hi) = (sv.min(), sv.max());
    if lo <= 0.0 || hi / lo > MAX_CONDITION {
        return Err(SimError::model(format!(
            "mass matrix is singular or ill-conditioned (singular values {lo:.3e}..{hi:.3e})"
        )));
    }
    m.try_inverse()
        .ok_or_else(|| SimError::model("mass matrix is not invertible"))
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Maritime Robotics Otter, 55 kg hull with a 25 kg payload.
    pub fn otter() -> VesselConfig {
        VesselConfig::default()
    }

    /// Same hull carrying no payload.
    pub fn otter_light() -> VesselConfig {
        VesselConfig {
            name: "Otter USV (no payload)".into(),
            payload_mass: 0.0,
            ..VesselConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mass_matrix_is_symmetric_positive_definite() {
        let v = Otter::new(presets::otter()).unwrap();
        assert_relative_eq!(v.m, v.m.transpose(), epsilon = 1e-9);
        let eig = v.m.symmetric_eigenvalues();
        assert!(eig.iter().all(|&e| e > 0.0), "eigenvalues {:?}", eig);
    }

    #[test]
    fn yaw_inertia_close_to_published_value() {
        // Including added mass the Otter has roughly 41-43 kg·m^2 in yaw
        let v = Otter::new(presets::otter()).unwrap();
        assert!(v.m[(5, 5)] > 38.0 && v.m[(5, 5)] < 46.0, "M66 = {}", v.m[(5, 5)]);
    }

    #[test]
    fn inverse_is_inverse() {
        let v = Otter::new(presets::otter()).unwrap();
        assert_relative_eq!(v.m * v.m_inv, Matrix6::identity(), epsilon = 1e-9);
    }

    #[test]
    fn hydrostatics_restore_heave_roll_pitch() {
        let v = Otter::new(presets::otter()).unwrap();
        assert!(v.g[(2, 2)] > 0.0);
        assert!(v.g[(3, 3)] > 0.0);
        assert!(v.g[(4, 4)] > 0.0);
        assert_eq!(v.g[(5, 5)], 0.0);
        assert!(v.draft > 0.1 && v.draft < 0.3);
    }

    #[test]
    fn massless_vessel_is_a_model_error() {
        let cfg = VesselConfig {
            mass: 0.0,
            payload_mass: 0.0,
            ..VesselConfig::default()
        };
        let err = Otter::new(cfg).unwrap_err();
        assert!(err.is_model_configuration(), "{err}");
    }

    #[test]
    fn light_variant_builds() {
        let v = Otter::new(presets::otter_light()).unwrap();
        assert_eq!(v.m_total, 55.0);
    }
}
