//! Canvas engine: an egui-painted implementation of [`MapEngine`].
//!
//! Draws the style background, fill layers and marker pins with the egui
//! painter, and turns pointer input into camera moves and settle events.
//! Events are queued and handed to the host through [`CanvasEngine::drain_events`]
//! once per frame.

mod gesture;
mod style;

pub use gesture::{Gesture, SCROLL_SETTLE};
pub use style::{fill_color, MapStyle, Palette};

use std::collections::{BTreeMap, HashMap, VecDeque};

use eframe::egui::{self, Align2, Color32, FontId, PointerButton, Pos2, Rect, Sense, Vec2};
use web_time::Instant;

use crate::engine::{
    EngineEvent, EngineFactory, FillLayer, LngLat, MapEngine, MapOptions, MarkerId, MarkerOptions,
};
use crate::error::EngineError;
use crate::geo::{
    pin_contains, render_fill_layer, render_graticule, render_marker_pin, GeoSource,
    MapProjection,
};
use crate::state::GeometryObject;
use gesture::{GestureTracker, ROTATE_DEGREES_PER_PIXEL, SCROLL_PIXELS_PER_ZOOM};

/// Fallback fill when a layer's color cannot be parsed.
const DEFAULT_FILL: Color32 = Color32::from_rgba_premultiplied(0, 64, 128, 128);

pub struct CanvasEngine {
    access_token: String,
    projection: MapProjection,
    style: MapStyle,
    attribution_control: bool,
    markers: BTreeMap<MarkerId, MarkerOptions>,
    next_marker: u64,
    sources: HashMap<String, GeoSource>,
    layers: Vec<FillLayer>,
    events: VecDeque<EngineEvent>,
    gestures: GestureTracker,
    /// Container size seen on the last frame; applied on `resize`.
    measured: Option<Rect>,
    load_queued: bool,
}

impl CanvasEngine {
    pub fn new(options: MapOptions) -> Self {
        Self {
            access_token: options.access_token,
            projection: MapProjection::new(options.center.into(), options.zoom),
            style: MapStyle::resolve(&options.style),
            attribution_control: options.attribution_control,
            markers: BTreeMap::new(),
            next_marker: 0,
            sources: HashMap::new(),
            layers: Vec::new(),
            events: VecDeque::new(),
            gestures: GestureTracker::default(),
            measured: None,
            load_queued: false,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn style(&self) -> MapStyle {
        self.style
    }

    pub fn bearing(&self) -> f64 {
        self.projection.bearing
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Hands queued events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Paints the map into the remaining space of `ui` and processes input.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.measured = Some(rect);

        if !self.load_queued {
            self.projection.screen_rect = rect;
            self.load_queued = true;
            self.events.push_back(EngineEvent::Load);
        }

        self.handle_input(&response, ui.ctx());

        let painter = ui.painter_at(rect);
        self.paint(&painter, rect);
        self.events.push_back(EngineEvent::Render);

        if self.gestures.is_scrolling() {
            ui.ctx().request_repaint_after(SCROLL_SETTLE);
        }

        response
    }

    fn handle_input(&mut self, response: &egui::Response, ctx: &egui::Context) {
        let now = Instant::now();

        if response.drag_started_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.begin_primary_drag(pos);
            }
        } else if response.drag_started_by(PointerButton::Secondary) {
            self.gestures.begin(Gesture::Rotating);
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.drag_to(pos, response.drag_delta());
            }
        }

        if response.drag_stopped() {
            self.end_drag();
        }

        let (scroll, zoom_factor, rotation) = ctx.input(|i| {
            (
                i.raw_scroll_delta.y,
                i.zoom_delta(),
                i.multi_touch().map(|touch| touch.rotation_delta),
            )
        });

        if response.hovered() {
            let anchor = response.hover_pos().unwrap_or(response.rect.center());
            if scroll != 0.0 {
                self.scroll_zoom(anchor, scroll as f64 / SCROLL_PIXELS_PER_ZOOM, now);
            }
            if zoom_factor != 1.0 {
                self.scroll_zoom(anchor, (zoom_factor as f64).log2(), now);
            }
        }

        if let Some(radians) = rotation {
            self.projection.rotate_by(-(radians as f64).to_degrees());
        }
        if self.gestures.touch_rotation(rotation.is_some()) {
            self.events.push_back(EngineEvent::RotateEnd);
            self.events.push_back(EngineEvent::MoveEnd);
        }

        if response.double_clicked() {
            self.reset_bearing();
        }

        self.tick(now);
    }

    /// Starts a marker drag when a draggable pin is under `pos`, otherwise
    /// a pan.
    pub fn begin_primary_drag(&mut self, pos: Pos2) {
        let gesture = match self.marker_at(pos) {
            Some((marker, position)) => Gesture::DraggingMarker { marker, position },
            None => Gesture::Panning,
        };
        self.gestures.begin(gesture);
    }

    pub fn begin_rotate(&mut self) {
        self.gestures.begin(Gesture::Rotating);
    }

    /// Continues the active drag: the pointer is at `pos` and moved by
    /// `delta` since the last frame.
    pub fn drag_to(&mut self, pos: Pos2, delta: Vec2) {
        match self.gestures.current() {
            Gesture::Idle => {}
            Gesture::Panning => self.projection.pan_by(delta),
            Gesture::Rotating => self
                .projection
                .rotate_by(delta.x as f64 * ROTATE_DEGREES_PER_PIXEL),
            Gesture::DraggingMarker { .. } => {
                let coord = self.projection.screen_to_geo(pos);
                let to = LngLat::new(coord.x, coord.y);
                if let Some(marker) = self.gestures.move_marker(to) {
                    if let Some(options) = self.markers.get_mut(&marker) {
                        options.position = to;
                    }
                }
            }
        }
    }

    /// Releases the active drag and queues its settle event.
    pub fn end_drag(&mut self) {
        match self.gestures.finish() {
            Gesture::Idle => {}
            Gesture::Panning => self.events.push_back(EngineEvent::MoveEnd),
            Gesture::Rotating => {
                self.events.push_back(EngineEvent::RotateEnd);
                self.events.push_back(EngineEvent::MoveEnd);
            }
            Gesture::DraggingMarker { marker, position } => {
                if self.markers.contains_key(&marker) {
                    self.events
                        .push_back(EngineEvent::MarkerDragEnd { marker, position });
                }
            }
        }
    }

    /// Zooms by `delta` levels around `anchor`; settles after a quiet period.
    pub fn scroll_zoom(&mut self, anchor: Pos2, delta: f64, now: Instant) {
        self.projection.zoom_around(anchor, delta);
        self.gestures.scrolled(now);
    }

    /// Emits a pending scroll-zoom settle once the quiet period has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.gestures.scroll_settled(now) {
            self.events.push_back(EngineEvent::MoveEnd);
        }
    }

    pub fn reset_bearing(&mut self) {
        if self.projection.bearing != 0.0 {
            self.projection.bearing = 0.0;
            self.events.push_back(EngineEvent::RotateEnd);
            self.events.push_back(EngineEvent::MoveEnd);
        }
    }

    /// Topmost draggable marker under `pos`.
    fn marker_at(&self, pos: Pos2) -> Option<(MarkerId, LngLat)> {
        self.markers
            .iter()
            .rev()
            .filter(|(_, m)| m.draggable && m.position.is_finite())
            .find(|(_, m)| pin_contains(self.projection.geo_to_screen(m.position.into()), pos))
            .map(|(id, m)| (*id, m.position))
    }

    fn paint(&self, painter: &egui::Painter, rect: Rect) {
        let palette = self.style.palette();
        painter.rect_filled(rect, 0.0, palette.background);
        render_graticule(painter, &self.projection, palette.graticule);

        for layer in &self.layers {
            let Some(source) = self.sources.get(&layer.source) else {
                continue;
            };
            let fill = fill_color(&layer.paint.color, layer.paint.opacity).unwrap_or(DEFAULT_FILL);
            render_fill_layer(painter, source, &self.projection, fill);
        }

        let dragging = match self.gestures.current() {
            Gesture::DraggingMarker { marker, .. } => Some(marker),
            _ => None,
        };
        for (id, marker) in &self.markers {
            if !marker.position.is_finite() {
                continue;
            }
            let tip = self.projection.geo_to_screen(marker.position.into());
            render_marker_pin(
                painter,
                tip,
                marker.index,
                palette.marker,
                palette.marker_outline,
                dragging == Some(*id),
            );
        }

        painter.text(
            rect.right_bottom() + Vec2::new(-8.0, -6.0),
            Align2::RIGHT_BOTTOM,
            format!(
                "z {:.2}  bearing {:.0}°",
                self.projection.zoom, self.projection.bearing
            ),
            FontId::monospace(10.0),
            palette.text,
        );
        if self.attribution_control {
            painter.text(
                rect.left_bottom() + Vec2::new(8.0, -6.0),
                Align2::LEFT_BOTTOM,
                self.style.label(),
                FontId::proportional(10.0),
                palette.text,
            );
        }
    }
}

impl MapEngine for CanvasEngine {
    fn center(&self) -> LngLat {
        LngLat::new(self.projection.center_lon, self.projection.center_lat)
    }

    fn zoom(&self) -> f64 {
        self.projection.zoom
    }

    fn set_center(&mut self, center: LngLat) {
        if self.center().approx_eq(&center, 0.0) {
            return;
        }
        self.projection.center_lon = center.lng;
        self.projection.center_lat = center.lat;
        self.events.push_back(EngineEvent::MoveEnd);
    }

    fn set_zoom(&mut self, zoom: f64) {
        let zoom = zoom.clamp(crate::geo::MIN_ZOOM, crate::geo::MAX_ZOOM);
        if self.projection.zoom == zoom {
            return;
        }
        self.projection.zoom = zoom;
        self.events.push_back(EngineEvent::MoveEnd);
    }

    fn set_style(&mut self, style: &str) {
        self.style = MapStyle::resolve(style);
    }

    fn resize(&mut self) {
        if let Some(rect) = self.measured {
            self.projection.screen_rect = rect;
        }
    }

    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, options);
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        self.markers.remove(&marker);
        self.gestures.cancel_marker(marker);
    }

    fn add_source(&mut self, id: &str, data: GeometryObject) -> Result<(), EngineError> {
        if self.sources.contains_key(id) {
            return Err(EngineError::DuplicateSource(id.to_string()));
        }
        let source = GeoSource::from_json(&data)?;
        log::debug!("Added source '{}' with {} features", id, source.features.len());
        self.sources.insert(id.to_string(), source);
        Ok(())
    }

    fn add_fill_layer(&mut self, layer: FillLayer) -> Result<(), EngineError> {
        if !self.sources.contains_key(&layer.source) {
            return Err(EngineError::UnknownSource(layer.source));
        }
        if self.layers.iter().any(|l| l.id == layer.id) {
            return Err(EngineError::DuplicateLayer(layer.id));
        }
        self.layers.push(layer);
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: GeometryObject) -> Result<(), EngineError> {
        let Some(source) = self.sources.get_mut(id) else {
            return Err(EngineError::UnknownSource(id.to_string()));
        };
        *source = GeoSource::from_json(&data)?;
        Ok(())
    }
}

/// Creates [`CanvasEngine`]s; the mount target handed to the core.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasEngineFactory;

impl EngineFactory for CanvasEngineFactory {
    type Engine = CanvasEngine;

    fn create(&mut self, options: MapOptions) -> Result<CanvasEngine, EngineError> {
        if options.access_token.trim().is_empty() {
            return Err(EngineError::MissingAccessToken);
        }
        log::info!(
            "Creating canvas map at {:?}, zoom {}",
            options.center,
            options.zoom
        );
        Ok(CanvasEngine::new(options))
    }
}
