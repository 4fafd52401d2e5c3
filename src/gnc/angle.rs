use std::f64::consts::{PI, TAU};

// ---------------------------------------------------------------------------
// Smallest signed angle
// ---------------------------------------------------------------------------

/// Map an angle in degrees to (-180, 180].
///
/// The result is congruent to the input modulo 360, so it can be used both to
/// sanitize setpoints and to turn a raw difference into the shortest-path error.
pub fn normalize(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Radian twin of [`normalize`]: maps to (-pi, pi].
pub fn normalize_rad(rad: f64) -> f64 {
    let wrapped = rad.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Wrap-safe heading error in radians, `normalize(setpoint - current)`.
pub fn heading_error(setpoint: f64, current: f64) -> f64 {
    normalize_rad(normalize_rad(setpoint) - normalize_rad(current))
}
