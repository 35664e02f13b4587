//! Geographic data and rendering for the canvas engine.
//!
//! Holds parsed GeoJSON sources, the camera projection, and the painter
//! routines that draw fill layers and marker pins.

mod layer;
mod projection;
mod renderer;

pub use layer::{GeoFeature, GeoSource};
pub use projection::{MapProjection, MAX_ZOOM, MIN_ZOOM};
pub use renderer::{pin_contains, render_fill_layer, render_graticule, render_marker_pin};
