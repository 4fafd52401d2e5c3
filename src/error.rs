use thiserror::Error;

use crate::sim::record::SimulationRecord;

/// Everything that can stop a run from producing a full record.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected at the boundary, before any step executes.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Physical parameters the dynamics cannot be integrated with.
    #[error("vessel model configuration: {0}")]
    ModelConfiguration(String),

    #[error("run cancelled")]
    Cancelled,

    /// A run that failed mid-loop. `partial` holds every sample logged before
    /// the failing step.
    #[error("run aborted at t = {time:.2} s after {} samples", .partial.len())]
    Aborted {
        time: f64,
        partial: SimulationRecord,
        #[source]
        cause: Box<SimError>,
    },
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn model(msg: impl Into<String>) -> Self {
        SimError::ModelConfiguration(msg.into())
    }

    /// The underlying failure, looking through `Aborted`.
    pub fn root(&self) -> &SimError {
        match self {
            SimError::Aborted { cause, .. } => cause.root(),
            other => other,
        }
    }

    /// Partial record of an aborted run.
    pub fn partial(&self) -> Option<&SimulationRecord> {
        match self {
            SimError::Aborted { partial, .. } => Some(partial),
            _ => None,
        }
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self.root(), SimError::InvalidConfiguration(_))
    }

    pub fn is_model_configuration(&self) -> bool {
        matches!(self.root(), SimError::ModelConfiguration(_))
    }
}

/// Reject NaN and infinities with a named message.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(format!("{name} must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_looks_through_aborted() {
        let err = SimError::Aborted {
            time: 1.5,
            partial: SimulationRecord::default(),
            cause: Box::new(SimError::model("state diverged")),
        };
        assert!(err.is_model_configuration());
        assert!(!err.is_invalid_configuration());
        assert_eq!(err.partial().map(|p| p.len()), Some(0));
        assert!(err.to_string().contains("t = 1.50 s"));
    }

    #[test]
    fn finite_check_names_the_field() {
        let err = ensure_finite("kp", f64::NAN).unwrap_err();
        assert!(err.to_string().contains("kp"));
        assert!(ensure_finite("kp", 1.0).is_ok());
    }
}
