//! Live diagnostics panel for the orbit viewer

use celestial::scenario::AU;
use celestial::NBodyEngine;
use egui::{Color32, Context, RichText};

/// Relative energy drift above which the readout turns red
const DRIFT_WARNING: f64 = 1e-3;

/// Conserved quantities at the latest sample
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub bodies: usize,
    pub frames: u64,
    pub energy: f64,
    /// Relative change since the body set last changed
    pub energy_drift: f64,
    pub momentum: f64,
    /// Center of mass in AU
    pub center_of_mass: [f64; 3],
}

/// Samples engine diagnostics and tracks energy drift between merges.
///
/// Merges do not conserve energy, so the baseline restarts whenever the
/// body count changes.
#[derive(Debug, Default)]
pub struct DiagnosticsPanel {
    baseline: Option<(usize, f64)>,
    latest: Option<Diagnostics>,
}

impl DiagnosticsPanel {
    pub fn sample(&mut self, engine: &NBodyEngine, frames: u64) -> &Diagnostics {
        let bodies = engine.bodies().len();
        let energy = engine.total_energy();

        let reference = match self.baseline {
            Some((count, reference)) if count == bodies => reference,
            _ => {
                self.baseline = Some((bodies, energy));
                energy
            }
        };
        let energy_drift = if reference != 0.0 {
            (energy - reference) / reference.abs()
        } else {
            0.0
        };

        let com = engine.center_of_mass();
        self.latest.insert(Diagnostics {
            bodies,
            frames,
            energy,
            energy_drift,
            momentum: engine.total_momentum().length(),
            center_of_mass: [com.x / AU, com.y / AU, com.z / AU],
        })
    }

    pub fn latest(&self) -> Option<&Diagnostics> {
        self.latest.as_ref()
    }

    pub fn show(&self, ctx: &Context) {
        let Some(d) = &self.latest else {
            return;
        };

        egui::SidePanel::right("diagnostics_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("Diagnostics").color(Color32::LIGHT_BLUE));
                ui.separator();

                egui::Grid::new("diagnostics_grid")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Bodies");
                        ui.label(d.bodies.to_string());
                        ui.end_row();

                        ui.label("Frames");
                        ui.label(d.frames.to_string());
                        ui.end_row();

                        ui.label("Energy (J)");
                        ui.monospace(format!("{:.4e}", d.energy));
                        ui.end_row();

                        let drift_color = if d.energy_drift.abs() > DRIFT_WARNING {
                            Color32::LIGHT_RED
                        } else {
                            Color32::LIGHT_GREEN
                        };
                        ui.label("ΔE / E");
                        ui.label(
                            RichText::new(format!("{:+.2e}", d.energy_drift))
                                .monospace()
                                .color(drift_color),
                        );
                        ui.end_row();

                        ui.label("|P| (kg·m/s)");
                        ui.monospace(format!("{:.4e}", d.momentum));
                        ui.end_row();

                        let [x, y, z] = d.center_of_mass;
                        ui.label("COM (AU)");
                        ui.monospace(format!("{x:+.3} {y:+.3} {z:+.3}"));
                        ui.end_row();
                    });

                ui.add_space(8.0);
                ui.collapsing(RichText::new("Model").strong(), |ui| {
                    ui.monospace("F = G·m₁·m₂ / (r² + ε²)");
                    ui.monospace("merge: m₁+m₂, v₁+v₂, R₁+√R₂");
                    ui.label(RichText::new("ΔE / E restarts after each merge").small());
                });
            });
    }
}
