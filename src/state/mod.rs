//! Host-facing state: the values the host owns and replays into the map.
//!
//! This module contains the binding snapshot, the point record model, the
//! viewport snapshot, and the write-back trait the core uses to update the
//! host.

mod bindings;
mod events;
mod point;
mod viewport;

pub use bindings::{
    default_geo_json, default_points, GeometryObject, MapBindings, DEFAULT_LATITUDE,
    DEFAULT_LONGITUDE, DEFAULT_STYLE, DEFAULT_ZOOM,
};
pub use events::{HostStore, MapEvent};
pub use point::{parse_coordinate, parse_coordinate_value, FieldNames, PointList, PointRecord};
pub use viewport::{format_coordinate, Viewport};
