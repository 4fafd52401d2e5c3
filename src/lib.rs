pub mod config;
pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vessel;

pub use config::{Params, SimConfig, DURATION, SAMPLE_TIME};
pub use error::SimError;
pub use sim::{on_parameters_changed, Session, SimulationRecord};

pub mod types {
    pub use crate::config::{AntiWindup, ControllerConfig, CurrentConfig, Params, SimConfig};
    pub use crate::dynamics::state::{ActuatorCommand, VesselState};
    pub use crate::vessel::VesselConfig;
}
