pub mod config;
pub mod otter;
pub mod thrusters;

pub use config::VesselConfig;
pub use otter::{presets, Otter};
pub use thrusters::Thrusters;
