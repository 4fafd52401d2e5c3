use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::Params;
use crate::gnc::angle;
use crate::sim::record::SimulationRecord;

/// Band around the setpoint used for the settling time, deg.
pub const SETTLING_BAND_DEG: f64 = 2.0;

/// Summary statistics computed from a simulation record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub samples: usize,
    pub duration_s: f64,
    pub final_heading_deg: f64,
    pub heading_error_deg: f64,
    pub overshoot_deg: f64,
    pub settling_time_s: Option<f64>,
    pub final_north_m: f64,
    pub final_east_m: f64,
    pub path_length_m: f64,
    pub max_speed_ms: f64,
}

impl RunSummary {
    /// Compute the summary for a run steering to `setpoint_deg`.
    /// Returns `None` for an empty record.
    pub fn from_record(record: &SimulationRecord, setpoint_deg: f64) -> Option<Self> {
        let first = record.first()?;
        let last = record.last()?;
        let error_at = |yaw: f64| angle::normalize(setpoint_deg - yaw.to_degrees());

        // Overshoot: how far the heading went past the setpoint, measured
        // against the direction of the initial turn.
        let turn = error_at(first.state.yaw()).signum();
        let overshoot = record
            .iter()
            .map(|s| -turn * error_at(s.state.yaw()))
            .fold(0.0_f64, f64::max);

        let settling_time = match record
            .iter()
            .rposition(|s| error_at(s.state.yaw()).abs() > SETTLING_BAND_DEG)
        {
            None => Some(first.time),
            Some(i) if i + 1 < record.len() => Some(record.samples()[i + 1].time),
            Some(_) => None,
        };

        let path_length = record
            .samples()
            .windows(2)
            .map(|w| (w[1].state.pos - w[0].state.pos).xy().norm())
            .sum();

        let max_speed = record
            .iter()
            .map(|s| s.state.speed())
            .fold(0.0_f64, f64::max);

        Some(RunSummary {
            samples: record.len(),
            duration_s: last.time - first.time,
            final_heading_deg: angle::normalize(last.state.yaw().to_degrees()),
            heading_error_deg: error_at(last.state.yaw()),
            overshoot_deg: overshoot,
            settling_time_s: settling_time,
            final_north_m: last.state.pos.x,
            final_east_m: last.state.pos.y,
            path_length_m: path_length,
            max_speed_ms: max_speed,
        })
    }
}

#[derive(Serialize)]
struct Report<'a> {
    vessel: &'a str,
    params: &'a Params,
    performance: &'a RunSummary,
}

/// Write a run summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    vessel: &str,
    params: &Params,
    summary: &RunSummary,
) -> io::Result<()> {
    let report = Report {
        vessel,
        params,
        performance: summary,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write run summary JSON to a file.
pub fn write_summary_file(
    path: impl AsRef<Path>,
    vessel: &str,
    params: &Params,
    summary: &RunSummary,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, vessel, params, summary)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::resim::on_parameters_changed;

    #[test]
    fn summary_of_default_run() {
        let params = Params::default();
        let rec = on_parameters_changed(&params).unwrap();
        let s = RunSummary::from_record(&rec, params.setpoint_deg).unwrap();
        assert_eq!(s.samples, 3001);
        assert!(s.heading_error_deg.abs() < 3.0);
        assert!(s.overshoot_deg >= 0.0);
        assert!(s.settling_time_s.is_some());
        assert!(s.path_length_m > 10.0);
        assert!(s.final_north_m > 0.0 && s.final_east_m > 0.0);
    }

    #[test]
    fn empty_record_has_no_summary() {
        assert!(RunSummary::from_record(&SimulationRecord::default(), 0.0).is_none());
    }

    #[test]
    fn json_output_is_valid() {
        let params = Params::default();
        let rec = on_parameters_changed(&params).unwrap();
        let summary = RunSummary::from_record(&rec, params.setpoint_deg).unwrap();

        let mut buf = Vec::new();
        write_summary(&mut buf, "Otter USV", &params, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["vessel"], "Otter USV");
        assert_eq!(value["params"]["kp"], 200.0);
        assert_eq!(value["performance"]["samples"], 3001);
    }
}
