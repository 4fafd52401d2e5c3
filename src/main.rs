use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use heading_autopilot::config::{Params, ScenarioFile};
use heading_autopilot::gnc::angle;
use heading_autopilot::io::{csv, json};
use heading_autopilot::sim::resim;
use heading_autopilot::vessel::Otter;

/// Simulate the Otter USV under the PID heading autopilot and print a report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML scenario file with optional [params], [vessel] and [sim] tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Surge force (N).
    #[arg(long)]
    tau_x: Option<f64>,
    #[arg(long)]
    kp: Option<f64>,
    #[arg(long)]
    ki: Option<f64>,
    #[arg(long)]
    kd: Option<f64>,
    /// Yaw angle setpoint (deg).
    #[arg(long, allow_hyphen_values = true)]
    setpoint: Option<f64>,
    /// Current speed (m/s).
    #[arg(long)]
    current_speed: Option<f64>,
    /// Current direction (deg), the direction the water flows towards.
    #[arg(long, allow_hyphen_values = true)]
    current_direction: Option<f64>,

    /// Write the full record as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the run summary as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, p: &mut Params) {
        let overrides = [
            (self.tau_x, &mut p.tau_x),
            (self.kp, &mut p.kp),
            (self.ki, &mut p.ki),
            (self.kd, &mut p.kd),
            (self.setpoint, &mut p.setpoint_deg),
            (self.current_speed, &mut p.current_speed),
            (self.current_direction, &mut p.current_direction_deg),
        ];
        for (value, field) in overrides {
            if let Some(v) = value {
                *field = v;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut scenario = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ScenarioFile::from_toml(&text)?
        }
        None => ScenarioFile::default(),
    };
    cli.apply(&mut scenario.params);
    let params = scenario.params;

    // Build once up front so model errors are reported before the run.
    let vessel = Otter::new(scenario.vessel.clone())?;
    let record = resim::resimulate(&scenario.vessel, &scenario.sim, &params)?;
    let setpoint = angle::normalize(params.setpoint_deg);
    let summary = json::RunSummary::from_record(&record, setpoint)
        .context("simulation produced no samples")?;

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  HEADING AUTOPILOT SIMULATION — {}", vessel.name());
    println!("====================================================================");
    println!();
    println!("  Vessel");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.1} kg    Yaw inertia:  {:>8.2} kg·m^2",
        vessel.m_total,
        vessel.m[(5, 5)]
    );
    println!(
        "  Length:        {:>8.2} m     Draft:        {:>8.3} m",
        vessel.config.length, vessel.draft
    );
    println!();

    println!("  Inputs");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Kp {:>7.1}   Ki {:>7.1}   Kd {:>7.1}   setpoint {:>7.1} deg",
        params.kp, params.ki, params.kd, setpoint
    );
    println!(
        "  Surge force {:>7.1} N   current {:>5.2} m/s towards {:>6.1} deg",
        params.tau_x, params.current_speed, params.current_direction_deg
    );
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Final heading: {:>8.2} deg  (error {:+.2} deg)",
        summary.final_heading_deg, summary.heading_error_deg
    );
    println!("  Overshoot:     {:>8.2} deg", summary.overshoot_deg);
    match summary.settling_time_s {
        Some(t) => println!(
            "  Settling:      {:>8.2} s   (±{} deg)",
            t,
            json::SETTLING_BAND_DEG
        ),
        None => println!("  Settling:      not settled within ±{} deg", json::SETTLING_BAND_DEG),
    }
    println!(
        "  Final pos:     N {:>8.1} m   E {:>8.1} m",
        summary.final_north_m, summary.final_east_m
    );
    println!(
        "  Path length:   {:>8.1} m   Max speed: {:>6.2} m/s",
        summary.path_length_m, summary.max_speed_ms
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>9}  {:>8}  {:>9}",
        "t (s)", "north (m)", "east (m)", "yaw (deg)", "u (m/s)", "tau_N"
    );
    println!("  {}", "─".repeat(62));

    let sample_interval = (record.len() / 30).max(1);
    for (i, s) in record.iter().enumerate() {
        if i % sample_interval != 0 && i != record.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.2}  {:>9.2}  {:>9.2}  {:>8.3}  {:>9.2}",
            s.time,
            s.state.pos.x,
            s.state.pos.y,
            angle::normalize(s.state.yaw().to_degrees()),
            s.state.vel.x,
            s.command.yaw_moment
        );
    }

    println!();
    println!(
        "  Simulation: {} samples, dt={} s",
        record.len(),
        scenario.sim.dt
    );
    println!("====================================================================");
    println!();

    if let Some(path) = &cli.csv {
        csv::write_record_file(path, &record)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "record written");
    }
    if let Some(path) = &cli.json {
        json::write_summary_file(path, vessel.name(), &params, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary written");
    }

    Ok(())
}
