//! Recording doubles for the engine and host boundaries.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::{
    EngineFactory, FillLayer, LngLat, MapEngine, MapOptions, MarkerId, MarkerOptions,
};
use crate::error::EngineError;
use crate::state::{GeometryObject, HostStore, MapBindings, MapEvent, PointList, Viewport};

#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub access_token: String,
    pub center: LngLat,
    pub zoom: f64,
    pub style: String,
    pub markers: HashMap<MarkerId, MarkerOptions>,
    pub removed: Vec<MarkerId>,
    pub sources: HashMap<String, GeometryObject>,
    pub layers: Vec<FillLayer>,
    /// Marker operations in call order, e.g. "add 3" / "remove 1".
    pub log: Vec<String>,
    pub set_center_calls: usize,
    pub set_zoom_calls: usize,
    pub set_style_calls: usize,
    pub resize_calls: usize,
    pub add_source_calls: usize,
    next_marker: u64,
}

impl RecordingEngine {
    pub fn at(center: LngLat, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Default::default()
        }
    }

    /// Moves the camera the way a user gesture would, without a command.
    pub fn gesture_to(&mut self, center: LngLat, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }
}

impl MapEngine for RecordingEngine {
    fn center(&self) -> LngLat {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_center(&mut self, center: LngLat) {
        self.set_center_calls += 1;
        self.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.set_zoom_calls += 1;
        self.zoom = zoom;
    }

    fn set_style(&mut self, style: &str) {
        self.set_style_calls += 1;
        self.style = style.to_string();
    }

    fn resize(&mut self) {
        self.resize_calls += 1;
    }

    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, options);
        self.log.push(format!("add {}", id.0));
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if self.markers.remove(&marker).is_some() {
            self.removed.push(marker);
            self.log.push(format!("remove {}", marker.0));
        }
    }

    fn add_source(&mut self, id: &str, data: GeometryObject) -> Result<(), EngineError> {
        self.add_source_calls += 1;
        if self.sources.contains_key(id) {
            return Err(EngineError::DuplicateSource(id.to_string()));
        }
        self.sources.insert(id.to_string(), data);
        Ok(())
    }

    fn add_fill_layer(&mut self, layer: FillLayer) -> Result<(), EngineError> {
        if self.layers.iter().any(|l| l.id == layer.id) {
            return Err(EngineError::DuplicateLayer(layer.id));
        }
        self.layers.push(layer);
        Ok(())
    }

    fn set_source_data(&mut self, id: &str, data: GeometryObject) -> Result<(), EngineError> {
        match self.sources.get_mut(id) {
            Some(source) => {
                *source = data;
                Ok(())
            }
            None => Err(EngineError::UnknownSource(id.to_string())),
        }
    }
}

/// Factory counting how many engines it built.
#[derive(Debug, Default, Clone)]
pub struct RecordingFactory {
    pub created: Rc<Cell<usize>>,
}

impl EngineFactory for RecordingFactory {
    type Engine = RecordingEngine;

    fn create(&mut self, options: MapOptions) -> Result<RecordingEngine, EngineError> {
        if options.access_token.trim().is_empty() {
            return Err(EngineError::MissingAccessToken);
        }
        self.created.set(self.created.get() + 1);
        let mut engine = RecordingEngine::at(options.center, options.zoom);
        engine.access_token = options.access_token;
        engine.style = options.style;
        Ok(engine)
    }
}

/// Host store that records every write and can replay it into bindings.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub longitude: Option<String>,
    pub latitude: Option<String>,
    pub zoom: Option<f64>,
    pub points: Option<PointList>,
    pub viewport: Option<Viewport>,
    pub events: Vec<MapEvent>,
}

impl RecordingHost {
    /// Applies pending writes to `bindings`, like a host re-render would.
    pub fn replay_into(&mut self, bindings: &mut MapBindings) {
        if let Some(longitude) = self.longitude.take() {
            bindings.longitude = longitude;
        }
        if let Some(latitude) = self.latitude.take() {
            bindings.latitude = latitude;
        }
        if let Some(zoom) = self.zoom.take() {
            bindings.zoom = zoom;
        }
        if let Some(points) = self.points.take() {
            bindings.points = points;
        }
    }
}

impl HostStore for RecordingHost {
    fn set_longitude(&mut self, longitude: String) {
        self.longitude = Some(longitude);
    }

    fn set_latitude(&mut self, latitude: String) {
        self.latitude = Some(latitude);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = Some(zoom);
    }

    fn set_points(&mut self, points: PointList) {
        self.points = Some(points);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn emit(&mut self, event: MapEvent) {
        self.events.push(event);
    }
}
