//! Bottom panel UI: notification event log.

use super::colors;
use crate::host::HostState;
use draggable_markers::MapEvent;
use eframe::egui::{self, RichText, ScrollArea};

pub fn render_bottom_panel(ctx: &egui::Context, host: &mut HostState) {
    egui::TopBottomPanel::bottom("bottom_panel")
        .resizable(true)
        .default_height(120.0)
        .min_height(60.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Events").strong());
                for event in MapEvent::all() {
                    ui.label(
                        RichText::new(format!("{} {}", event, host.events.count(*event)))
                            .small()
                            .color(colors::events::color(*event)),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Clear").clicked() {
                        host.events.clear();
                    }
                    ui.label(
                        RichText::new(format!("{} total", host.events.total()))
                            .small()
                            .color(colors::ui::LABEL),
                    );
                });
            });
            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for entry in host.events.iter() {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(entry.at.format("%H:%M:%S%.3f").to_string())
                                    .monospace()
                                    .color(colors::ui::LABEL),
                            );
                            ui.label(
                                RichText::new(entry.event.name())
                                    .monospace()
                                    .color(colors::events::color(entry.event)),
                            );
                            ui.label(
                                RichText::new(&entry.detail)
                                    .monospace()
                                    .color(colors::ui::VALUE),
                            );
                        });
                    }
                });
        });
}
