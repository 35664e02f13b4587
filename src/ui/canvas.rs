//! Central canvas UI: the map itself, or a placeholder while inert.

use draggable_markers::canvas::{CanvasEngine, CanvasEngineFactory};
use draggable_markers::{MapEngine, MarkerMap};
use eframe::egui::{self, Color32, Rect, RichText, Vec2};

pub fn render_canvas(ctx: &egui::Context, map: &mut MarkerMap<CanvasEngineFactory>) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| match map.engine_mut() {
            Some(engine) => {
                let response = engine.show(ui);
                draw_overlay_info(ui, &response.rect, engine);
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Enter an access token to create the map")
                            .size(14.0)
                            .color(Color32::GRAY),
                    );
                });
            }
        });
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, engine: &CanvasEngine) {
    let overlay_rect =
        Rect::from_min_size(rect.left_top() + Vec2::new(10.0, 10.0), Vec2::new(220.0, 40.0));
    let color = engine.style().palette().text;
    let center = engine.center();

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new(format!("{:.5}, {:.5}", center.lng, center.lat))
                    .monospace()
                    .size(12.0)
                    .color(color),
            );
            ui.label(
                RichText::new(format!(
                    "{} markers, {} layers",
                    engine.marker_count(),
                    engine.layer_count()
                ))
                .monospace()
                .size(12.0)
                .color(color),
            );
        });
    });
}
