pub mod sixdof;
pub mod state;

pub use sixdof::derivatives;
pub use state::{ActuatorCommand, Deriv, VesselState};
