//! Point records and the externally owned point list.
//!
//! Records are plain field mappings. Which fields hold the coordinates is
//! configuration (`FieldNames`), not schema, so hosts can bind any record
//! shape that carries a longitude and a latitude somewhere.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Deref;
use std::sync::Arc;

use crate::engine::LngLat;

/// Names of the coordinate fields inside each point record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub longitude: String,
    pub latitude: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            longitude: "longitude".to_string(),
            latitude: "latitude".to_string(),
        }
    }
}

impl FieldNames {
    pub fn new(longitude: impl Into<String>, latitude: impl Into<String>) -> Self {
        Self {
            longitude: longitude.into(),
            latitude: latitude.into(),
        }
    }
}

/// A single point record: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointRecord(Map<String, Value>);

impl PointRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record holding only the two coordinate fields.
    pub fn from_position(fields: &FieldNames, position: LngLat) -> Self {
        let mut record = Self::new();
        record.set_position(fields, position);
        record
    }

    /// Convenience constructor from string coordinates, the shape hosts
    /// usually bind.
    pub fn with_coordinates(fields: &FieldNames, longitude: &str, latitude: &str) -> Self {
        let mut record = Self::new();
        record.insert(&fields.longitude, Value::String(longitude.to_string()));
        record.insert(&fields.latitude, Value::String(latitude.to_string()));
        record
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: &str, value: Value) -> Option<Value> {
        self.0.insert(field.to_string(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads one coordinate field. Strings are parsed, numbers taken as-is,
    /// anything else (missing, null, garbage) is NaN.
    pub fn coordinate(&self, field: &str) -> f64 {
        self.get(field).map(parse_coordinate_value).unwrap_or(f64::NAN)
    }

    /// Reads the record's position using the configured field names.
    pub fn position(&self, fields: &FieldNames) -> LngLat {
        LngLat::new(
            self.coordinate(&fields.longitude),
            self.coordinate(&fields.latitude),
        )
    }

    /// Overwrites the two coordinate fields, leaving the rest untouched.
    pub fn set_position(&mut self, fields: &FieldNames, position: LngLat) {
        self.insert(&fields.longitude, coordinate_to_value(position.lng));
        self.insert(&fields.latitude, coordinate_to_value(position.lat));
    }
}

impl From<Map<String, Value>> for PointRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Parses a coordinate from a JSON value the way the host hands it over.
pub fn parse_coordinate_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_coordinate(s),
        _ => f64::NAN,
    }
}

/// Parses a coordinate string. Unparsable input is NaN, never an error.
pub fn parse_coordinate(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// JSON has no NaN, so non-finite coordinates are written as null.
fn coordinate_to_value(coordinate: f64) -> Value {
    serde_json::Number::from_f64(coordinate)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Ordered, immutable snapshot of point records.
///
/// Cloning shares the underlying allocation; two lists are "the same list"
/// only when they share it. Any edit produces a new list.
#[derive(Debug, Clone)]
pub struct PointList(Arc<[PointRecord]>);

impl PointList {
    pub fn new(records: Vec<PointRecord>) -> Self {
        Self(records.into())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// True when both handles refer to the same snapshot.
    pub fn same_list(&self, other: &PointList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy-on-write replacement of a single entry.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn with_replaced(&self, index: usize, record: PointRecord) -> Option<PointList> {
        if index >= self.0.len() {
            return None;
        }
        let mut records = self.0.to_vec();
        records[index] = record;
        Some(Self::new(records))
    }

    /// Parses a JSON array of objects. Non-object entries become empty
    /// records so indices stay aligned with the host's array.
    pub fn from_json_value(value: &Value) -> Option<PointList> {
        let items = value.as_array()?;
        let records = items
            .iter()
            .map(|item| match item {
                Value::Object(map) => PointRecord::from(map.clone()),
                _ => PointRecord::new(),
            })
            .collect();
        Some(Self::new(records))
    }

    pub fn to_json_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|record| Value::Object(record.0.clone()))
                .collect(),
        )
    }
}

impl Default for PointList {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for PointList {
    type Target = [PointRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for PointList {
    fn eq(&self, other: &Self) -> bool {
        self.0[..] == other.0[..]
    }
}

impl Serialize for PointList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for PointList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<PointRecord>::deserialize(deserializer).map(PointList::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinate_parsing() {
        let fields = FieldNames::default();
        let record = PointRecord::with_coordinates(&fields, "-122.4194", " 37.7949 ");
        let position = record.position(&fields);

        assert!((position.lng + 122.4194).abs() < 1e-9);
        assert!((position.lat - 37.7949).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_prefix_is_unparsable() {
        assert!(parse_coordinate("12px").is_nan());
        assert!(parse_coordinate("").is_nan());
        assert_eq!(parse_coordinate("1e2"), 100.0);
    }

    #[test]
    fn test_numeric_and_malformed_values() {
        let record: PointRecord =
            serde_json::from_value(json!({ "x": 12.5, "y": "north", "z": null })).unwrap();

        assert_eq!(record.coordinate("x"), 12.5);
        assert!(record.coordinate("y").is_nan());
        assert!(record.coordinate("z").is_nan());
        assert!(record.coordinate("missing").is_nan());
    }

    #[test]
    fn test_custom_field_names() {
        let fields = FieldNames::new("lng", "lat");
        let record: PointRecord =
            serde_json::from_value(json!({ "lng": "-1.5", "lat": "2.5", "longitude": "9" }))
                .unwrap();

        assert_eq!(record.position(&fields), LngLat::new(-1.5, 2.5));
    }

    #[test]
    fn test_with_replaced_is_copy_on_write() {
        let fields = FieldNames::default();
        let list = PointList::new(vec![
            PointRecord::with_coordinates(&fields, "1", "2"),
            PointRecord::with_coordinates(&fields, "3", "4"),
        ]);

        let replaced = list
            .with_replaced(1, PointRecord::from_position(&fields, LngLat::new(5.0, 6.0)))
            .unwrap();

        assert!(!replaced.same_list(&list));
        assert_eq!(list[1].coordinate("longitude"), 3.0);
        assert_eq!(replaced[1].coordinate("longitude"), 5.0);
        assert_eq!(replaced[0], list[0]);
        assert!(list.with_replaced(2, PointRecord::new()).is_none());
    }

    #[test]
    fn test_same_list_tracks_identity_not_value() {
        let fields = FieldNames::default();
        let records = vec![PointRecord::with_coordinates(&fields, "1", "2")];
        let a = PointList::new(records.clone());
        let b = PointList::new(records);

        assert_eq!(a, b);
        assert!(!a.same_list(&b));
        assert!(a.same_list(&a.clone()));
    }

    #[test]
    fn test_from_json_keeps_indices_aligned() {
        let list = PointList::from_json_value(&json!([{ "longitude": "1" }, 7, {}])).unwrap();

        assert_eq!(list.len(), 3);
        assert!(list[1].is_empty());
        assert!(PointList::from_json_value(&json!({ "not": "an array" })).is_none());
    }

    #[test]
    fn test_nan_position_serializes_as_null() {
        let fields = FieldNames::default();
        let record = PointRecord::from_position(&fields, LngLat::new(f64::NAN, 1.0));

        assert_eq!(record.get("longitude"), Some(&Value::Null));
    }
}
