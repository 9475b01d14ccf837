/// Timeline toolbar UI - marker, zoom and blade controls
use eframe::egui;
use timeline_core::{TimelineSnapshot, MAX_ZOOM, MIN_ZOOM};

use crate::keyboard::KeyCommand;

/// Timeline toolbar state
#[derive(Default)]
pub struct TimelineToolbar {
    pub show_keyboard_help: bool,
}

impl TimelineToolbar {
    /// Draw the toolbar. Returns the commands whose buttons were clicked;
    /// the multi-segment checkbox edits `multi_segment` in place.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        snapshot: &TimelineSnapshot,
        blade_mode: bool,
        multi_segment: &mut bool,
    ) -> Vec<KeyCommand> {
        let mut clicked = Vec::new();
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format_clock(snapshot.current_time))
                    .monospace()
                    .size(14.0),
            );

            ui.separator();

            if !*multi_segment {
                if ui.button("Set In").clicked() {
                    clicked.push(KeyCommand::SetInPoint);
                }
                if ui.button("Set Out").clicked() {
                    clicked.push(KeyCommand::SetOutPoint);
                }
                if ui.button("Clear").clicked() {
                    clicked.push(KeyCommand::ClearInOut);
                }
                if let Some(markers) = snapshot.markers() {
                    match markers.trim_duration() {
                        Some(trim) if trim < 0.0 => {
                            ui.label(
                                egui::RichText::new(format!("Trim: {}", format_clock(trim)))
                                    .color(egui::Color32::from_rgb(255, 120, 90)),
                            );
                        }
                        Some(trim) => {
                            ui.label(format!("Trim: {}", format_clock(trim)));
                        }
                        None => {
                            ui.label(egui::RichText::new("Trim: --").weak());
                        }
                    }
                }
                ui.separator();
            }

            let zoom_out = ui.add_enabled(snapshot.zoom > MIN_ZOOM, egui::Button::new("-"));
            if zoom_out.clicked() {
                clicked.push(KeyCommand::ZoomOut);
            }
            ui.label(format!("{:.2}x", snapshot.zoom));
            let zoom_in = ui.add_enabled(snapshot.zoom < MAX_ZOOM, egui::Button::new("+"));
            if zoom_in.clicked() {
                clicked.push(KeyCommand::ZoomIn);
            }

            ui.separator();

            ui.checkbox(multi_segment, "Segments");
            if *multi_segment {
                let blade_text = if blade_mode { "Blade: ON" } else { "Blade: OFF" };
                let blade = ui.add(egui::Button::new(blade_text).selected(blade_mode));
                if blade.clicked() {
                    clicked.push(KeyCommand::ToggleBlade);
                }
            }

            ui.separator();

            if ui.button("Shortcuts").clicked() {
                self.show_keyboard_help = !self.show_keyboard_help;
            }
        });
        clicked
    }

    pub fn keyboard_help(&mut self, ctx: &egui::Context) {
        egui::Window::new("Keyboard Shortcuts")
            .open(&mut self.show_keyboard_help)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("timeline_shortcuts").striped(true).show(ui, |ui| {
                    for command in KeyCommand::all() {
                        ui.label(egui::RichText::new(command.shortcut_text()).monospace());
                        ui.label(command.description());
                        ui.end_row();
                    }
                });
            });
    }
}

/// `m:ss.cc`, with a leading minus for negative spans.
pub fn format_clock(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let centis = (seconds.abs() * 100.0).round() as u64;
    let minutes = centis / 6000;
    let secs = (centis / 100) % 60;
    let frac = centis % 100;
    format!("{sign}{minutes}:{secs:02}.{frac:02}")
}
