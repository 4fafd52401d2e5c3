use tracing::debug;

use crate::config::{Params, SimConfig};
use crate::error::SimError;
use crate::vessel::VesselConfig;
use super::record::SimulationRecord;
use super::runner;

// ---------------------------------------------------------------------------
// Re-simulation on parameter change
// ---------------------------------------------------------------------------

/// Validate `params`, build fresh configs and rerun the default Otter scenario
/// from the all-zero state. Identical parameters give identical records.
pub fn on_parameters_changed(params: &Params) -> Result<SimulationRecord, SimError> {
    resimulate(&VesselConfig::default(), &SimConfig::default(), params)
}

/// Same as [`on_parameters_changed`] for an explicit vessel and time base.
pub fn resimulate(
    vessel: &VesselConfig,
    sim: &SimConfig,
    params: &Params,
) -> Result<SimulationRecord, SimError> {
    let (controller, current) = params.to_configs()?;
    runner::run(vessel, &controller, &current, sim)
}

/// Owner of the latest run for an interactive front end.
///
/// Triggers take `&mut self`, so two runs can never interleave on one session;
/// a front end that batches edits simply calls with the most recent values.
#[derive(Debug, Default)]
pub struct Session {
    vessel: VesselConfig,
    sim: SimConfig,
    last: Option<(Params, SimulationRecord)>,
    runs: usize,
}

impl Session {
    pub fn new(vessel: VesselConfig, sim: SimConfig) -> Self {
        Self {
            vessel,
            sim,
            last: None,
            runs: 0,
        }
    }

    /// Rerun for `params`, or return the stored record if they are unchanged.
    /// A failed run leaves the previous record in place.
    pub fn on_parameters_changed(&mut self, params: &Params) -> Result<&SimulationRecord, SimError> {
        let fresh = match &self.last {
            Some((prev, _)) if prev == params => {
                debug!("parameters unchanged, reusing last record");
                false
            }
            _ => true,
        };
        if fresh {
            let record = resimulate(&self.vessel, &self.sim, params)?;
            self.runs += 1;
            self.last = Some((*params, record));
        }
        match &self.last {
            Some((_, record)) => Ok(record),
            None => Err(SimError::invalid("no simulation has completed")),
        }
    }

    pub fn last_record(&self) -> Option<&SimulationRecord> {
        self.last.as_ref().map(|(_, r)| r)
    }

    pub fn last_params(&self) -> Option<&Params> {
        self.last.as_ref().map(|(p, _)| p)
    }

    /// Number of runs actually executed.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn vessel(&self) -> &VesselConfig {
        &self.vessel
    }
}
