//! Render-engine boundary.
//!
//! The map renderer is an external collaborator. The synchronization core
//! talks to it only through [`MapEngine`] (commands) and [`EngineEvent`]
//! (lifecycle and gesture notifications the engine reports back). The
//! engine is created through an [`EngineFactory`], which stands in for the
//! mount target the host provides.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::state::GeometryObject;

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// True when both components are within `epsilon` degrees.
    ///
    /// NaN never compares equal, so a NaN target always counts as a move.
    pub fn approx_eq(&self, other: &LngLat, epsilon: f64) -> bool {
        (self.lng - other.lng).abs() <= epsilon && (self.lat - other.lat).abs() <= epsilon
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl From<LngLat> for geo_types::Coord<f64> {
    fn from(value: LngLat) -> Self {
        geo_types::Coord {
            x: value.lng,
            y: value.lat,
        }
    }
}

/// Engine-assigned handle for a live marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Everything needed to construct the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Credential, threaded explicitly into the engine rather than set
    /// globally.
    pub access_token: String,
    pub style: String,
    pub center: LngLat,
    pub zoom: f64,
    pub attribution_control: bool,
}

/// A draggable overlay request. `index` is the logical back-reference to
/// the point list entry this marker represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOptions {
    pub position: LngLat,
    pub draggable: bool,
    pub index: usize,
}

/// Paint properties of a fill layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FillPaint {
    /// CSS-style hex color, e.g. `#0080ff`.
    pub color: String,
    pub opacity: f32,
}

/// A fill-type layer reading one source.
#[derive(Debug, Clone, PartialEq)]
pub struct FillLayer {
    pub id: String,
    pub source: String,
    pub paint: FillPaint,
}

/// Notifications the engine reports back to the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Initial load finished; sources and layers may now be added.
    Load,
    /// A frame was rendered.
    Render,
    /// A pan/zoom settled.
    MoveEnd,
    /// A rotation settled.
    RotateEnd,
    /// A marker drag finished at `position`.
    MarkerDragEnd { marker: MarkerId, position: LngLat },
}

/// Commands the core issues against a live map.
pub trait MapEngine {
    fn center(&self) -> LngLat;

    fn zoom(&self) -> f64;

    /// Re-centers the camera without changing zoom.
    fn set_center(&mut self, center: LngLat);

    /// Changes zoom around the current center.
    fn set_zoom(&mut self, zoom: f64);

    /// Switches the visual style. Must not change center or zoom.
    fn set_style(&mut self, style: &str);

    /// Re-measures the container.
    fn resize(&mut self);

    fn add_marker(&mut self, options: MarkerOptions) -> MarkerId;

    /// Detaches a marker and its drag wiring. Unknown ids are ignored.
    fn remove_marker(&mut self, marker: MarkerId);

    fn add_source(&mut self, id: &str, data: GeometryObject) -> Result<(), EngineError>;

    fn add_fill_layer(&mut self, layer: FillLayer) -> Result<(), EngineError>;

    /// Replaces a source's data in place.
    fn set_source_data(&mut self, id: &str, data: GeometryObject) -> Result<(), EngineError>;
}

/// Creates engines. Owning a factory is what "mounted" means to the core.
pub trait EngineFactory {
    type Engine: MapEngine;

    fn create(&mut self, options: MapOptions) -> Result<Self::Engine, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        let a = LngLat::new(-122.0, 37.0);

        assert!(a.approx_eq(&LngLat::new(-122.0 + 1e-10, 37.0), 1e-9));
        assert!(!a.approx_eq(&LngLat::new(-122.1, 37.0), 1e-9));
        assert!(!a.approx_eq(&LngLat::new(f64::NAN, 37.0), 1e-9));
    }
}
