//! State-synchronization core.
//!
//! [`MarkerMap`] owns the lazily-created engine and the three controllers.
//! The host calls [`MarkerMap::sync`] with its current bindings whenever they
//! may have changed, and feeds engine notifications into
//! [`MarkerMap::handle_event`]. Each call runs to completion.

pub mod camera;
pub mod geometry;
pub mod overlays;

#[cfg(test)]
pub(crate) mod test_support;

pub use camera::CameraController;
pub use geometry::GeometryLayerSync;
pub use overlays::{DragWriteBack, Overlay, OverlayReconciler};

use serde::{Deserialize, Serialize};

use crate::engine::{EngineEvent, EngineFactory};
use crate::state::{FieldNames, GeometryObject, HostStore, MapBindings, MapEvent, PointList};

/// Tunables for the synchronization core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Decimals used when writing longitude/latitude back to the host.
    pub coordinate_decimals: usize,
    /// Degrees below which a re-center is skipped.
    pub recenter_epsilon: f64,
    pub drag_write_back: DragWriteBack,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            coordinate_decimals: 6,
            recenter_epsilon: 1e-9,
            drag_write_back: DragWriteBack::Replace,
        }
    }
}

/// Binding values seen on the previous sync, used for change detection.
struct Seen {
    access_token: String,
    longitude: String,
    latitude: String,
    zoom: f64,
    map_style: String,
    points: PointList,
    fields: FieldNames,
    geo_json: Option<GeometryObject>,
}

impl Seen {
    fn capture(bindings: &MapBindings) -> Self {
        Self {
            access_token: bindings.access_token.clone(),
            longitude: bindings.longitude.clone(),
            latitude: bindings.latitude.clone(),
            zoom: bindings.zoom,
            map_style: bindings.map_style.clone(),
            points: bindings.points.clone(),
            fields: bindings.field_names(),
            geo_json: bindings.geo_json.clone(),
        }
    }
}

fn same_geometry(a: Option<&GeometryObject>, b: Option<&GeometryObject>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => std::sync::Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// The draggable-marker map: one mounted instance.
pub struct MarkerMap<F: EngineFactory> {
    factory: Option<F>,
    engine: Option<F::Engine>,
    camera: CameraController,
    overlays: OverlayReconciler,
    geometry: GeometryLayerSync,
    seen: Option<Seen>,
    /// Set when a factory was (re)attached and initialization should be
    /// retried even though the credential did not change.
    mount_dirty: bool,
}

impl<F: EngineFactory> MarkerMap<F> {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            factory: None,
            engine: None,
            camera: CameraController::new(config.coordinate_decimals, config.recenter_epsilon),
            overlays: OverlayReconciler::new(config.drag_write_back),
            geometry: GeometryLayerSync::new(),
            seen: None,
            mount_dirty: false,
        }
    }

    /// Attaches the mount target. Initialization happens on the next sync.
    pub fn mount(&mut self, factory: F) {
        self.factory = Some(factory);
        self.mount_dirty = true;
    }

    /// Detaches the mount target and tears the engine down.
    pub fn unmount(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            self.overlays.retire_all(engine);
        }
        self.engine = None;
        self.factory = None;
        self.camera.reset();
        self.geometry.reset();
        log::info!("Map unmounted");
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.geometry.is_loaded()
    }

    pub fn engine(&self) -> Option<&F::Engine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut F::Engine> {
        self.engine.as_mut()
    }

    pub fn overlays(&self) -> &[Overlay] {
        self.overlays.overlays()
    }

    /// Applies a host replay. Reactions run in order: initialization,
    /// geometry, style, points, center, zoom.
    pub fn sync<H: HostStore>(&mut self, bindings: &MapBindings, host: &mut H) {
        let previous = self.seen.take();
        let prev = previous.as_ref();

        let token_changed = prev.map_or(true, |p| p.access_token != bindings.access_token);
        let created = self.ensure_engine(bindings, token_changed);

        let fields = bindings.field_names();
        let geometry_changed = prev.map_or(true, |p| {
            !same_geometry(p.geo_json.as_ref(), bindings.geo_json.as_ref())
        });
        let style_changed = prev.map_or(true, |p| p.map_style != bindings.map_style);
        let points_changed = prev.map_or(true, |p| {
            !p.points.same_list(&bindings.points) || p.fields != fields
        });
        let center_changed = prev.map_or(true, |p| {
            p.longitude != bindings.longitude || p.latitude != bindings.latitude
        });
        let zoom_changed = prev.map_or(true, |p| p.zoom != bindings.zoom);

        self.seen = Some(Seen::capture(bindings));
        self.geometry.observe(bindings.geo_json.as_ref());

        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        if geometry_changed {
            self.geometry.on_change(engine, bindings.geo_json.as_ref());
        }
        if style_changed && !created {
            self.camera.apply_style(engine, &bindings.map_style);
        }
        if points_changed || created {
            self.overlays.reconcile(engine, &bindings.points, &fields);
        }
        if center_changed || created {
            self.camera.apply_center(
                engine,
                &bindings.longitude,
                &bindings.latitude,
                bindings.zoom,
                host,
            );
        }
        if zoom_changed && !created {
            self.camera.apply_zoom(engine, bindings.zoom, host);
        }
    }

    /// Routes an engine notification to the controller that owns it.
    pub fn handle_event<H: HostStore>(&mut self, event: EngineEvent, host: &mut H) {
        let Some(engine) = self.engine.as_mut() else {
            log::debug!("Dropping {:?} with no live engine", event);
            return;
        };

        match event {
            EngineEvent::Load => {
                log::info!("Map loaded");
                self.geometry.on_load(engine);
            }
            EngineEvent::Render => self.camera.on_render(engine),
            EngineEvent::MoveEnd => self.camera.settle(engine, MapEvent::ViewportChanged, host),
            EngineEvent::RotateEnd => self.camera.settle(engine, MapEvent::RotateEnd, host),
            EngineEvent::MarkerDragEnd { marker, position } => {
                self.overlays.finish_drag(marker, position, host);
            }
        }
    }

    /// Creates the engine once. Returns true when it was created just now.
    fn ensure_engine(&mut self, bindings: &MapBindings, token_changed: bool) -> bool {
        if self.engine.is_some() {
            return false;
        }
        if !token_changed && !self.mount_dirty {
            return false;
        }
        let Some(factory) = self.factory.as_mut() else {
            return false;
        };
        self.mount_dirty = false;

        let Some(options) = self.camera.map_options(bindings) else {
            return false;
        };

        match factory.create(options) {
            Ok(engine) => {
                log::info!("Map created");
                self.engine = Some(engine);
                true
            }
            Err(e) => {
                log::error!("Failed to create map: {}", e);
                false
            }
        }
    }
}
