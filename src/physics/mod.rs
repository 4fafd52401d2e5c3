pub mod current;
pub mod hydrodynamics;
pub mod kinematics;

pub const G: f64 = 9.81; // m/s^2

pub use current::OceanCurrent;
