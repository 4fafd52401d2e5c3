pub mod angle;
pub mod autopilot;
pub mod controller;
pub mod pid;

pub use angle::{heading_error, normalize, normalize_rad};
pub use autopilot::HeadingAutopilot;
pub use controller::Controller;
pub use pid::Pid;
