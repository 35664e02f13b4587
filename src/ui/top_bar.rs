//! Top bar UI: app title, map status, and marker count.

use super::colors;
use draggable_markers::canvas::CanvasEngineFactory;
use draggable_markers::MarkerMap;
use eframe::egui::{self, Color32, RichText};

use crate::host::HostState;

pub fn render_top_bar(ctx: &egui::Context, host: &HostState, map: &MarkerMap<CanvasEngineFactory>) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("Draggable Markers")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                let (status, color) = if !map.is_initialized() {
                    ("inert", colors::status::INERT)
                } else if !map.is_loaded() {
                    ("loading", colors::status::LOADING)
                } else {
                    ("loaded", colors::status::LOADED)
                };
                ui.label(RichText::new("\u{25CF}").color(color));
                ui.label(RichText::new(status).size(13.0).color(Color32::GRAY));

                ui.separator();

                ui.label(
                    RichText::new(format!(
                        "{} points, {} markers",
                        host.bindings().points.len(),
                        map.overlays().len()
                    ))
                    .size(13.0)
                    .color(Color32::GRAY),
                );
            });
        });
}
