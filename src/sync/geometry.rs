//! Geometry layer sync: one external geometry object -> one fill layer.

use std::sync::Arc;

use crate::engine::{FillLayer, FillPaint, MapEngine};
use crate::state::GeometryObject;

pub const SOURCE_ID: &str = "geojson-polygon";
pub const LAYER_ID: &str = "geojson-polygon-layer";
pub const FILL_COLOR: &str = "#0080ff";
pub const FILL_OPACITY: f32 = 0.5;

pub struct GeometryLayerSync {
    /// Latest geometry replayed by the host.
    latest: Option<GeometryObject>,
    /// Data currently held by the engine source, if the source exists.
    applied: Option<GeometryObject>,
    loaded: bool,
}

impl Default for GeometryLayerSync {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryLayerSync {
    pub fn new() -> Self {
        Self {
            latest: None,
            applied: None,
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_layer(&self) -> bool {
        self.applied.is_some()
    }

    /// Records the host's current geometry without touching the engine.
    pub fn observe(&mut self, geometry: Option<&GeometryObject>) {
        self.latest = geometry.cloned();
    }

    /// Initial load: create the source and its single fill layer from the
    /// latest geometry, then mark the map loaded.
    pub fn on_load<E: MapEngine>(&mut self, engine: &mut E) {
        if self.loaded {
            return;
        }

        if let Some(geometry) = self.latest.clone() {
            match create_layer(engine, geometry.clone()) {
                Ok(()) => self.applied = Some(geometry),
                Err(e) => log::error!("Failed to create geometry layer: {}", e),
            }
        }

        self.loaded = true;
    }

    /// Geometry changed after construction. Dropped unless the map has
    /// loaded and a source exists.
    pub fn on_change<E: MapEngine>(&mut self, engine: &mut E, geometry: Option<&GeometryObject>) {
        if !self.loaded {
            log::debug!("Map not loaded yet, dropping geometry update");
            return;
        }
        let Some(geometry) = geometry else {
            return;
        };
        let Some(applied) = self.applied.as_ref() else {
            log::debug!("No geometry source was created at load, dropping geometry update");
            return;
        };
        if Arc::ptr_eq(applied, geometry) {
            return;
        }

        match engine.set_source_data(SOURCE_ID, geometry.clone()) {
            Ok(()) => self.applied = Some(geometry.clone()),
            Err(e) => log::error!("Failed to update geometry source: {}", e),
        }
    }

    /// Forgets engine-side state after the engine is dropped.
    pub fn reset(&mut self) {
        self.applied = None;
        self.loaded = false;
    }
}

fn create_layer<E: MapEngine>(
    engine: &mut E,
    geometry: GeometryObject,
) -> Result<(), crate::error::EngineError> {
    engine.add_source(SOURCE_ID, geometry)?;
    engine.add_fill_layer(FillLayer {
        id: LAYER_ID.to_string(),
        source: SOURCE_ID.to_string(),
        paint: FillPaint {
            color: FILL_COLOR.to_string(),
            opacity: FILL_OPACITY,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::default_geo_json;
    use crate::sync::test_support::RecordingEngine;
    use serde_json::json;

    fn geometry() -> GeometryObject {
        Arc::new(default_geo_json())
    }

    #[test]
    fn test_load_creates_one_source_and_layer() {
        let mut engine = RecordingEngine::default();
        let mut sync = GeometryLayerSync::new();

        sync.observe(Some(&geometry()));
        sync.on_load(&mut engine);
        sync.on_load(&mut engine);

        assert!(sync.is_loaded());
        assert_eq!(engine.sources.len(), 1);
        assert_eq!(engine.layers.len(), 1);
        let layer = &engine.layers[0];
        assert_eq!(layer.id, LAYER_ID);
        assert_eq!(layer.source, SOURCE_ID);
        assert_eq!(layer.paint.color, "#0080ff");
        assert_eq!(layer.paint.opacity, 0.5);
    }

    #[test]
    fn test_change_after_load_replaces_data_in_place() {
        let mut engine = RecordingEngine::default();
        let mut sync = GeometryLayerSync::new();
        sync.observe(Some(&geometry()));
        sync.on_load(&mut engine);

        let updated: GeometryObject =
            Arc::new(json!({ "type": "FeatureCollection", "features": [] }));
        sync.observe(Some(&updated));
        sync.on_change(&mut engine, Some(&updated));

        assert_eq!(engine.sources.len(), 1);
        assert_eq!(engine.layers.len(), 1);
        assert_eq!(engine.add_source_calls, 1);
        assert!(Arc::ptr_eq(&engine.sources[SOURCE_ID], &updated));
    }

    #[test]
    fn test_change_before_load_is_dropped() {
        let mut engine = RecordingEngine::default();
        let mut sync = GeometryLayerSync::new();

        sync.on_change(&mut engine, Some(&geometry()));

        assert!(engine.sources.is_empty());
        assert!(!sync.is_loaded());
    }

    #[test]
    fn test_load_without_geometry_creates_nothing() {
        let mut engine = RecordingEngine::default();
        let mut sync = GeometryLayerSync::new();

        sync.on_load(&mut engine);
        sync.on_change(&mut engine, Some(&geometry()));

        assert!(sync.is_loaded());
        assert!(!sync.has_layer());
        assert!(engine.sources.is_empty());
        assert!(engine.layers.is_empty());
    }

    #[test]
    fn test_load_uses_latest_geometry() {
        let mut engine = RecordingEngine::default();
        let mut sync = GeometryLayerSync::new();
        let first = geometry();
        let second = geometry();

        sync.observe(Some(&first));
        sync.observe(Some(&second));
        sync.on_load(&mut engine);

        assert!(Arc::ptr_eq(&engine.sources[SOURCE_ID], &second));
    }

    #[test]
    fn test_removed_geometry_keeps_layer() {
        let mut engine = RecordingEngine::default();
        let mut sync = GeometryLayerSync::new();
        let initial = geometry();
        sync.observe(Some(&initial));
        sync.on_load(&mut engine);

        sync.observe(None);
        sync.on_change(&mut engine, None);

        assert!(Arc::ptr_eq(&engine.sources[SOURCE_ID], &initial));
        assert_eq!(engine.layers.len(), 1);
    }
}
