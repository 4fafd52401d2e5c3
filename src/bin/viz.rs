use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use heading_autopilot::config::{Params, SimConfig};
use heading_autopilot::gnc::angle;
use heading_autopilot::sim::Session;
use heading_autopilot::vessel::VesselConfig;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut app = AutopilotViz {
        session: Session::new(VesselConfig::default(), SimConfig::default()),
        params: Params::default(),
        dirty: false,
        error: None,
    };
    app.rerun();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Heading Autopilot", options, Box::new(|_| Ok(Box::new(app))))
}

struct AutopilotViz {
    session: Session,
    params: Params,
    dirty: bool,
    error: Option<String>,
}

impl AutopilotViz {
    fn rerun(&mut self) {
        self.error = self
            .session
            .on_parameters_changed(&self.params)
            .err()
            .map(|e| e.to_string());
        self.dirty = false;
    }

    fn param_panel(&mut self, ui: &mut egui::Ui) {
        let p = &mut self.params;
        let rows: [(&str, &mut f64, f64, &str); 7] = [
            ("Surge force", &mut p.tau_x, 1.0, " N"),
            ("Kp", &mut p.kp, 1.0, ""),
            ("Ki", &mut p.ki, 0.1, ""),
            ("Kd", &mut p.kd, 1.0, ""),
            ("Setpoint", &mut p.setpoint_deg, 1.0, " deg"),
            ("Current speed", &mut p.current_speed, 0.01, " m/s"),
            ("Current direction", &mut p.current_direction_deg, 1.0, " deg"),
        ];
        egui::Grid::new("params").num_columns(2).show(ui, |ui| {
            for (label, value, speed, suffix) in rows {
                ui.label(label);
                if ui
                    .add(egui::DragValue::new(value).speed(speed).suffix(suffix))
                    .changed()
                {
                    self.dirty = true;
                }
                ui.end_row();
            }
        });
        ui.separator();
        if ui.button("Reset").clicked() {
            self.params = Params::default();
            self.dirty = true;
        }
    }
}

impl eframe::App for AutopilotViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Parameters");
            self.param_panel(ui);
            if let Some(err) = &self.error {
                ui.separator();
                ui.colored_label(egui::Color32::RED, err);
            }
        });

        // All edits made this frame collapse into one run.
        if self.dirty {
            self.rerun();
        }

        let Some(record) = self.session.last_record() else {
            return;
        };
        let setpoint = self
            .session
            .last_params()
            .map_or(0.0, |p| angle::normalize(p.setpoint_deg));
        let step = (record.len() / 2000).max(1);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(self.session.vessel().name.as_str());
            if let Some(last) = record.last() {
                ui.label(format!(
                    "Final heading: {:.1} deg  |  Position: N {:.1} m, E {:.1} m  |  Runs: {}",
                    angle::normalize(last.state.yaw().to_degrees()),
                    last.state.pos.x,
                    last.state.pos.y,
                    self.session.runs(),
                ));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Yaw vs Time
                ui.vertical(|ui| {
                    ui.label("Yaw Angle (deg)");
                    let points: PlotPoints = record
                        .heading_series()
                        .into_iter()
                        .step_by(step)
                        .collect();
                    let t_end = record.last().map_or(0.0, |s| s.time);
                    let target = PlotPoints::new(vec![[0.0, setpoint], [t_end, setpoint]]);
                    Plot::new("yaw")
                        .width(half_w)
                        .height(available.y - 16.0)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Yaw", points));
                            plot_ui.line(Line::new("Setpoint", target));
                        });
                });

                // North vs East
                ui.vertical(|ui| {
                    ui.label("Track (m)");
                    let points: PlotPoints = record
                        .track()
                        .into_iter()
                        .step_by(step)
                        .map(|[north, east]| [east, north])
                        .collect();
                    Plot::new("track")
                        .width(half_w)
                        .height(available.y - 16.0)
                        .x_axis_label("East (m)")
                        .y_axis_label("North (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Track", points));
                        });
                });
            });
        });
    }
}
