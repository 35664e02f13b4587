//! Snapshot of every host binding the map reads.
//!
//! The host replays a `MapBindings` into the core whenever any of its values
//! may have changed. Field names serialize under the host's binding names so
//! a host configuration can be loaded straight from JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{FieldNames, PointList, PointRecord};
use crate::error::BindingsError;

/// Externally owned geometry object (typically a GeoJSON feature collection).
///
/// Identity is the allocation: a host "changes" the geometry by handing over
/// a new `Arc`.
pub type GeometryObject = Arc<Value>;

pub const DEFAULT_LONGITUDE: &str = "-122.4376";
pub const DEFAULT_LATITUDE: &str = "37.7577";
pub const DEFAULT_ZOOM: f64 = 9.0;
pub const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/light-v11";

/// Input bindings, one field per host value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapBindings {
    /// Credential required before any map is created.
    pub access_token: String,
    pub longitude: String,
    pub latitude: String,
    pub zoom: f64,
    pub points: PointList,
    pub latitude_field_name: String,
    pub longitude_field_name: String,
    #[serde(rename = "geoJSON")]
    pub geo_json: Option<GeometryObject>,
    pub map_style: String,
}

impl Default for MapBindings {
    fn default() -> Self {
        let fields = FieldNames::default();
        Self {
            access_token: String::new(),
            longitude: DEFAULT_LONGITUDE.to_string(),
            latitude: DEFAULT_LATITUDE.to_string(),
            zoom: DEFAULT_ZOOM,
            points: default_points(&fields),
            latitude_field_name: fields.latitude,
            longitude_field_name: fields.longitude,
            geo_json: Some(Arc::new(default_geo_json())),
            map_style: DEFAULT_STYLE.to_string(),
        }
    }
}

impl MapBindings {
    /// Loads bindings from a host configuration; missing keys keep defaults.
    pub fn from_json(text: &str) -> Result<Self, BindingsError> {
        let value: Value = serde_json::from_str(text)?;
        if let Some(points) = value.get("points") {
            if !points.is_array() {
                return Err(BindingsError::PointsNotArray);
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn field_names(&self) -> FieldNames {
        FieldNames::new(&self.longitude_field_name, &self.latitude_field_name)
    }

    /// True when the credential gate is open.
    pub fn has_access_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

/// Sample points shipped as the initial value of the `points` binding.
pub fn default_points(fields: &FieldNames) -> PointList {
    PointList::new(vec![
        PointRecord::with_coordinates(fields, "-122.4194", "37.7949"),
        PointRecord::with_coordinates(fields, "-122.4794", "37.7749"),
        PointRecord::with_coordinates(fields, "-122.4194", "37.7049"),
    ])
}

/// Sample polygon shipped as the initial value of the `geoJSON` binding.
/// Coordinates are numeric strings, which engines are expected to tolerate.
pub fn default_geo_json() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [
                            ["-122.454", "37.766"],
                            ["-122.51", "37.764"],
                            ["-122.51", "37.772"],
                            ["-122.455", "37.773"]
                        ]
                    ]
                }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let bindings = MapBindings::default();

        assert_eq!(bindings.longitude, "-122.4376");
        assert_eq!(bindings.latitude, "37.7577");
        assert_eq!(bindings.zoom, 9.0);
        assert_eq!(bindings.points.len(), 3);
        assert!(bindings.geo_json.is_some());
        assert!(!bindings.has_access_token());
    }

    #[test]
    fn test_from_json_uses_binding_names() {
        let bindings = MapBindings::from_json(
            r#"{
                "accessToken": "pk.test",
                "zoom": 4.5,
                "longitudeFieldName": "lng",
                "latitudeFieldName": "lat",
                "points": [{ "lng": "1", "lat": "2" }],
                "geoJSON": null,
                "mapStyle": "mapbox://styles/mapbox/dark-v11"
            }"#,
        )
        .unwrap();

        assert!(bindings.has_access_token());
        assert_eq!(bindings.zoom, 4.5);
        assert_eq!(bindings.field_names(), FieldNames::new("lng", "lat"));
        assert_eq!(bindings.points[0].coordinate("lat"), 2.0);
        assert!(bindings.geo_json.is_none());
        // Unspecified bindings keep their defaults.
        assert_eq!(bindings.longitude, DEFAULT_LONGITUDE);
    }

    #[test]
    fn test_from_json_rejects_non_array_points() {
        let result = MapBindings::from_json(r#"{ "points": { "a": 1 } }"#);
        assert!(matches!(result, Err(BindingsError::PointsNotArray)));
    }

    #[test]
    fn test_whitespace_token_is_blank() {
        let bindings = MapBindings {
            access_token: "   ".to_string(),
            ..Default::default()
        };
        assert!(!bindings.has_access_token());
    }
}
