//! Geographic source data held by the canvas engine.

use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry, Value};
use serde_json::Value as JsonValue;

use crate::error::EngineError;

/// A geographic feature that can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    Point(Coord<f64>),
    LineString(Vec<Coord<f64>>),
    /// A closed polygon; holes are kept but only outlined.
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
    },
}

/// Parsed contents of one GeoJSON source.
#[derive(Debug, Clone, Default)]
pub struct GeoSource {
    pub features: Vec<GeoFeature>,
}

impl GeoSource {
    /// Parses a GeoJSON value. Coordinates given as numeric strings are
    /// accepted and converted to numbers first.
    pub fn from_json(value: &JsonValue) -> Result<Self, EngineError> {
        let mut normalized = value.clone();
        normalize_coordinates(&mut normalized);

        let geojson = GeoJson::from_json_value(normalized)
            .map_err(|e| EngineError::InvalidGeoJson(e.to_string()))?;

        let mut source = GeoSource::default();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    source.push_feature(feature);
                }
            }
            GeoJson::Feature(f) => source.push_feature(&f),
            GeoJson::Geometry(g) => source.push_geometry(&g),
        }

        Ok(source)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn push_feature(&mut self, feature: &Feature) {
        if let Some(geometry) = feature.geometry.as_ref() {
            self.push_geometry(geometry);
        }
    }

    fn push_geometry(&mut self, geometry: &Geometry) {
        match &geometry.value {
            Value::Point(c) => {
                if let Some(coord) = to_coord(c) {
                    self.features.push(GeoFeature::Point(coord));
                }
            }
            Value::MultiPoint(points) => {
                self.features
                    .extend(points.iter().filter_map(|c| to_coord(c)).map(GeoFeature::Point));
            }
            Value::LineString(line) => {
                self.features.push(GeoFeature::LineString(to_ring(line)));
            }
            Value::MultiLineString(lines) => {
                self.features
                    .extend(lines.iter().map(|line| GeoFeature::LineString(to_ring(line))));
            }
            Value::Polygon(rings) => {
                if let Some(polygon) = to_polygon(rings) {
                    self.features.push(polygon);
                }
            }
            Value::MultiPolygon(polygons) => {
                self.features
                    .extend(polygons.iter().filter_map(|rings| to_polygon(rings)));
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.push_geometry(g);
                }
            }
        }
    }
}

fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn to_ring(positions: &[Vec<f64>]) -> Vec<Coord<f64>> {
    positions.iter().filter_map(|p| to_coord(p)).collect()
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<GeoFeature> {
    let (exterior, holes) = rings.split_first()?;
    Some(GeoFeature::Polygon {
        exterior: to_ring(exterior),
        holes: holes.iter().map(|ring| to_ring(ring)).collect(),
    })
}

/// Rewrites numeric strings inside every `coordinates` member to numbers.
fn normalize_coordinates(value: &mut JsonValue) {
    match value {
        JsonValue::Object(map) => {
            for (key, member) in map.iter_mut() {
                if key == "coordinates" {
                    numbers_from_strings(member);
                } else {
                    normalize_coordinates(member);
                }
            }
        }
        JsonValue::Array(items) => items.iter_mut().for_each(normalize_coordinates),
        _ => {}
    }
}

fn numbers_from_strings(value: &mut JsonValue) {
    match value {
        JsonValue::Array(items) => items.iter_mut().for_each(numbers_from_strings),
        JsonValue::String(text) => {
            if let Some(number) = text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                *value = JsonValue::Number(number);
            }
        }
        _ => {}
    }
}
