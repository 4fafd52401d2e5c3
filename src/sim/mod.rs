pub mod integrator;
pub mod record;
pub mod resim;
pub mod runner;

pub use integrator::rk4_step;
pub use record::{Sample, SimulationRecord};
pub use resim::{on_parameters_changed, resimulate, Session};
pub use runner::{run, simulate_cancellable, simulate_with};
