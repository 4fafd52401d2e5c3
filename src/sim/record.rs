use crate::dynamics::state::{ActuatorCommand, VesselState};
use crate::gnc::angle;

/// One logged step: the state at `time` and the command computed from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub state: VesselState,
    pub command: ActuatorCommand,
}

/// Time-ordered output of one run. Read-only once the run returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationRecord {
    samples: Vec<Sample>,
}

impl SimulationRecord {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            samples: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// (time, heading in degrees normalized to (-180, 180]) for plotting.
    pub fn heading_series(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|s| [s.time, angle::normalize(s.state.yaw().to_degrees())])
            .collect()
    }

    /// (north, east) track in metres.
    pub fn track(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|s| [s.state.pos.x, s.state.pos.y])
            .collect()
    }
}

impl<'a> IntoIterator for &'a SimulationRecord {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
