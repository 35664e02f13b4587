//! Left panel UI: inspector for every host binding.

use std::sync::Arc;

use super::colors;
use crate::host::HostState;
use draggable_markers::canvas::MapStyle;
use draggable_markers::state::GeometryObject;
use draggable_markers::{DragWriteBack, PointList};
use eframe::egui::{self, RichText, ScrollArea};

/// Text buffers for the JSON editors. Refreshed whenever the underlying
/// binding is replaced from outside the editor.
#[derive(Default)]
pub struct InspectorBuffers {
    points_text: String,
    shown_points: Option<PointList>,
    geo_json_text: String,
    shown_geo_json: Option<Option<GeometryObject>>,
    error: Option<String>,
}

impl InspectorBuffers {
    fn refresh(&mut self, host: &HostState) {
        let bindings = host.bindings();

        let points_stale = self
            .shown_points
            .as_ref()
            .map_or(true, |shown| !shown.same_list(&bindings.points));
        if points_stale {
            self.points_text = pretty(&bindings.points.to_json_value());
            self.shown_points = Some(bindings.points.clone());
        }

        let geo_json_stale = match (&self.shown_geo_json, &bindings.geo_json) {
            (Some(Some(shown)), Some(current)) => !Arc::ptr_eq(shown, current),
            (Some(None), None) => false,
            _ => true,
        };
        if geo_json_stale {
            self.geo_json_text = bindings
                .geo_json
                .as_ref()
                .map(|value| pretty(value))
                .unwrap_or_default();
            self.shown_geo_json = Some(bindings.geo_json.clone());
        }
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

pub fn render_left_panel(
    ctx: &egui::Context,
    host: &mut HostState,
    buffers: &mut InspectorBuffers,
) {
    buffers.refresh(host);

    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(300.0)
        .min_width(240.0)
        .max_width(480.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Bindings");
                ui.separator();

                render_map_section(ui, host);
                ui.add_space(5.0);

                render_viewport_section(ui, host);
                ui.add_space(5.0);

                render_points_section(ui, host, buffers);
                ui.add_space(5.0);

                render_geometry_section(ui, host, buffers);

                if let Some(error) = &buffers.error {
                    ui.add_space(5.0);
                    ui.label(RichText::new(error).small().color(colors::ui::ERROR));
                }
            });
        });
}

fn render_map_section(ui: &mut egui::Ui, host: &mut HostState) {
    egui::CollapsingHeader::new(RichText::new("Map").strong())
        .default_open(true)
        .show(ui, |ui| {
            ui.label(RichText::new("Access token").small().color(colors::ui::LABEL));
            let mut token = host.bindings().access_token.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut token).password(true))
                .changed()
            {
                host.bindings_mut().access_token = token;
            }

            ui.label(RichText::new("Style").small().color(colors::ui::LABEL));
            let current = host.bindings().map_style.clone();
            let selected = MapStyle::parse(&current)
                .map(|s| s.label().to_string())
                .unwrap_or(current);
            egui::ComboBox::from_id_salt("style_selector")
                .selected_text(selected)
                .width(180.0)
                .show_ui(ui, |ui| {
                    for style in MapStyle::all() {
                        if ui.selectable_label(false, style.label()).clicked() {
                            host.bindings_mut().map_style = style.url();
                        }
                    }
                });

            ui.label(RichText::new("Drag write-back").small().color(colors::ui::LABEL));
            ui.horizontal(|ui| {
                let mut mode = host.settings.sync.drag_write_back;
                ui.radio_value(&mut mode, DragWriteBack::Replace, "Replace");
                ui.radio_value(&mut mode, DragWriteBack::Merge, "Merge");
                if mode != host.settings.sync.drag_write_back {
                    host.settings.sync.drag_write_back = mode;
                    host.dirty = true;
                }
            });
        });
}

fn render_viewport_section(ui: &mut egui::Ui, host: &mut HostState) {
    egui::CollapsingHeader::new(RichText::new("Viewport").strong())
        .default_open(true)
        .show(ui, |ui| {
            egui::Grid::new("viewport_grid").num_columns(2).show(ui, |ui| {
                ui.label(RichText::new("Longitude").small().color(colors::ui::LABEL));
                let mut longitude = host.bindings().longitude.clone();
                if ui.text_edit_singleline(&mut longitude).changed() {
                    host.bindings_mut().longitude = longitude;
                }
                ui.end_row();

                ui.label(RichText::new("Latitude").small().color(colors::ui::LABEL));
                let mut latitude = host.bindings().latitude.clone();
                if ui.text_edit_singleline(&mut latitude).changed() {
                    host.bindings_mut().latitude = latitude;
                }
                ui.end_row();

                ui.label(RichText::new("Zoom").small().color(colors::ui::LABEL));
                let mut zoom = host.bindings().zoom;
                if ui
                    .add(egui::DragValue::new(&mut zoom).range(0.0..=22.0).speed(0.05))
                    .changed()
                {
                    host.bindings_mut().zoom = zoom;
                }
                ui.end_row();
            });

            ui.add_space(4.0);
            let snapshot = match host.viewport {
                Some(v) => format!("{:.6}, {:.6} @ z{:.2}", v.longitude, v.latitude, v.zoom),
                None => "no snapshot yet".to_string(),
            };
            ui.label(RichText::new(snapshot).monospace().small().color(colors::ui::VALUE));
        });
}

fn render_points_section(ui: &mut egui::Ui, host: &mut HostState, buffers: &mut InspectorBuffers) {
    egui::CollapsingHeader::new(RichText::new("Points").strong())
        .default_open(true)
        .show(ui, |ui| {
            egui::Grid::new("field_grid").num_columns(2).show(ui, |ui| {
                ui.label(RichText::new("Longitude field").small().color(colors::ui::LABEL));
                let mut field = host.bindings().longitude_field_name.clone();
                if ui.text_edit_singleline(&mut field).changed() {
                    host.bindings_mut().longitude_field_name = field;
                }
                ui.end_row();

                ui.label(RichText::new("Latitude field").small().color(colors::ui::LABEL));
                let mut field = host.bindings().latitude_field_name.clone();
                if ui.text_edit_singleline(&mut field).changed() {
                    host.bindings_mut().latitude_field_name = field;
                }
                ui.end_row();
            });

            ui.add(
                egui::TextEdit::multiline(&mut buffers.points_text)
                    .code_editor()
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            if ui.button("Apply points").clicked() {
                match serde_json::from_str::<serde_json::Value>(&buffers.points_text) {
                    Ok(value) => match PointList::from_json_value(&value) {
                        Some(points) => {
                            host.bindings_mut().points = points;
                            buffers.error = None;
                        }
                        None => buffers.error = Some("points must be a JSON array".to_string()),
                    },
                    Err(e) => buffers.error = Some(format!("points: {}", e)),
                }
            }
        });
}

fn render_geometry_section(
    ui: &mut egui::Ui,
    host: &mut HostState,
    buffers: &mut InspectorBuffers,
) {
    egui::CollapsingHeader::new(RichText::new("GeoJSON").strong())
        .default_open(false)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(&mut buffers.geo_json_text)
                    .code_editor()
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                if ui.button("Apply geometry").clicked() {
                    match serde_json::from_str::<serde_json::Value>(&buffers.geo_json_text) {
                        Ok(value) => {
                            host.bindings_mut().geo_json = Some(Arc::new(value));
                            buffers.error = None;
                        }
                        Err(e) => buffers.error = Some(format!("geoJSON: {}", e)),
                    }
                }
                if ui.button("Clear").clicked() {
                    host.bindings_mut().geo_json = None;
                }
            });
        });
}
