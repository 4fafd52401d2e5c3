use nalgebra::{Matrix6, Vector3, Vector6};

use super::kinematics::smtrx;

pub const RHO_WATER: f64 = 1026.0; // kg/m^3, sea water

// ---------------------------------------------------------------------------
// Coriolis-centripetal matrix from a 6x6 mass matrix
// ---------------------------------------------------------------------------

/// C(nu) for a (symmetrized) mass matrix, skew-symmetric parametrization.
pub fn coriolis_from_mass(m: &Matrix6<f64>, nu: &Vector6<f64>) -> Matrix6<f64> {
    let m = 0.5 * (m + m.transpose());
    let nu1 = nu.fixed_rows::<3>(0).into_owned();
    let nu2 = nu.fixed_rows::<3>(3).into_owned();

    let m11 = m.fixed_view::<3, 3>(0, 0);
    let m12 = m.fixed_view::<3, 3>(0, 3);
    let m21 = m.fixed_view::<3, 3>(3, 0);
    let m22 = m.fixed_view::<3, 3>(3, 3);

    let dt_dnu1: Vector3<f64> = m11 * nu1 + m12 * nu2;
    let dt_dnu2: Vector3<f64> = m21 * nu1 + m22 * nu2;

    let mut c = Matrix6::zeros();
    c.fixed_view_mut::<3, 3>(0, 3).copy_from(&(-smtrx(&dt_dnu1)));
    c.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-smtrx(&dt_dnu1)));
    c.fixed_view_mut::<3, 3>(3, 3).copy_from(&(-smtrx(&dt_dnu2)));
    c
}

// ---------------------------------------------------------------------------
// Cross-flow drag (strip theory)
// ---------------------------------------------------------------------------

// Hoerner's 2-D cross-flow drag coefficient vs. B / 2T.
const HOERNER_B2T: [f64; 20] = [
    0.0109, 0.1766, 0.3530, 0.4519, 0.4728, 0.4929, 0.4933, 0.5585, 0.6464, 0.8336, 0.9880,
    1.3081, 1.6392, 1.8600, 2.3129, 2.6000, 3.0088, 3.4508, 3.7379, 4.0031,
];
const HOERNER_CD: [f64; 20] = [
    1.9661, 1.9657, 1.8976, 1.7872, 1.5837, 1.2786, 1.2108, 1.0836, 0.9986, 0.8796, 0.8284,
    0.7599, 0.6914, 0.6571, 0.6307, 0.5962, 0.5868, 0.5859, 0.5599, 0.5593,
];

/// 2-D cross-flow drag coefficient for a section of beam `b` and draft `t`,
/// linearly interpolated and held constant outside the table.
pub fn hoerner(b: f64, t: f64) -> f64 {
    let x = b / (2.0 * t);
    if x <= HOERNER_B2T[0] {
        return HOERNER_CD[0];
    }
    for i in 1..HOERNER_B2T.len() {
        if x <= HOERNER_B2T[i] {
            let (x0, x1) = (HOERNER_B2T[i - 1], HOERNER_B2T[i]);
            let (y0, y1) = (HOERNER_CD[i - 1], HOERNER_CD[i]);
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    HOERNER_CD[HOERNER_CD.len() - 1]
}

const STRIPS: usize = 20;

/// Sway force and yaw moment from cross-flow drag over the hull length,
/// given the relative velocity `nu_r`.
pub fn crossflow_drag(length: f64, beam: f64, draft: f64, nu_r: &Vector6<f64>) -> Vector6<f64> {
    let dx = length / STRIPS as f64;
    let cd_2d = hoerner(beam, draft);
    let v_r = nu_r[1];
    let r = nu_r[5];

    let mut yh = 0.0;
    let mut nh = 0.0;
    for i in 0..=STRIPS {
        let x_l = -length / 2.0 + i as f64 * dx;
        let local = v_r + x_l * r;
        let ucf = local.abs() * local;
        yh -= 0.5 * RHO_WATER * draft * cd_2d * ucf * dx;
        nh -= 0.5 * RHO_WATER * draft * cd_2d * x_l * ucf * dx;
    }

    Vector6::new(0.0, yh, 0.0, 0.0, 0.0, nh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn coriolis_is_skew_symmetric() {
        let m = Matrix6::from_diagonal(&Vector6::new(80.0, 160.0, 135.0, 25.0, 45.0, 42.0));
        let nu = Vector6::new(1.5, 0.2, 0.0, 0.01, -0.02, 0.3);
        let c = coriolis_from_mass(&m, &nu);
        assert_relative_eq!(c, -c.transpose(), epsilon = 1e-9);
        // Kinetic energy is conserved: nu' C nu = 0
        assert_relative_eq!(nu.dot(&(c * nu)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn hoerner_interpolates_and_clamps() {
        assert_relative_eq!(hoerner(0.0, 1.0), 1.9661);
        assert_relative_eq!(hoerner(100.0, 1.0), 0.5593);
        let mid = hoerner(2.0 * 0.6, 1.0);
        assert!(mid < 1.0836 && mid > 0.9986);
    }

    #[test]
    fn crossflow_opposes_sway() {
        let nu_r = Vector6::new(0.0, 0.5, 0.0, 0.0, 0.0, 0.0);
        let tau = crossflow_drag(2.0, 0.25, 0.2, &nu_r);
        assert!(tau[1] < 0.0);
        // Symmetric hull: pure sway gives no yaw moment
        assert_relative_eq!(tau[5], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn crossflow_damps_yaw_rate() {
        let nu_r = Vector6::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.4);
        let tau = crossflow_drag(2.0, 0.25, 0.2, &nu_r);
        assert!(tau[5] < 0.0);
    }

    #[test]
    fn no_flow_no_force() {
        let tau = crossflow_drag(2.0, 0.25, 0.2, &Vector6::zeros());
        assert_eq!(tau, Vector6::zeros());
    }
}
