use nalgebra::{Matrix3, Matrix6, Rotation3, Vector3};

/// Skew-symmetric matrix with `smtrx(a) * b == a.cross(&b)`.
pub fn smtrx(a: &Vector3<f64>) -> Matrix3<f64> {
    a.cross_matrix()
}

/// System transformation matrix moving a 6DOF quantity from a point at `r`
/// (relative to the body origin) to the origin.
pub fn hmtrx(r: &Vector3<f64>) -> Matrix6<f64> {
    let mut h = Matrix6::identity();
    h.fixed_view_mut::<3, 3>(0, 3).copy_from(&smtrx(r).transpose());
    h
}

/// Body-to-NED rotation from zyx Euler angles.
pub fn rzyx(phi: f64, theta: f64, psi: f64) -> Matrix3<f64> {
    Rotation3::from_euler_angles(phi, theta, psi).into_inner()
}

/// Euler angle rate transform, attitude_dot = tzyx(phi, theta) * omega.
/// Singular at theta = ±90°; the caller catches the resulting non-finite state.
pub fn tzyx(phi: f64, theta: f64) -> Matrix3<f64> {
    let (sphi, cphi) = phi.sin_cos();
    let cth = theta.cos();
    let tth = theta.tan();
    Matrix3::new(
        1.0, sphi * tth, cphi * tth,
        0.0, cphi, -sphi,
        0.0, sphi / cth, cphi / cth,
    )
}
