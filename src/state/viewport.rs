//! Composite viewport snapshot published to the host.

use serde::{Deserialize, Serialize};

use crate::engine::LngLat;

/// Read-only {longitude, latitude, zoom} snapshot of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self {
            longitude: center.lng,
            latitude: center.lat,
            zoom,
        }
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}

/// Formats a coordinate with a fixed number of decimals for the scalar
/// bindings. NaN renders as "NaN", which parses back to NaN.
pub fn format_coordinate(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::point::parse_coordinate;

    #[test]
    fn test_format_fixed_six() {
        assert_eq!(format_coordinate(-122.4376, 6), "-122.437600");
        assert_eq!(format_coordinate(37.0, 6), "37.000000");
        assert_eq!(format_coordinate(0.12345678, 6), "0.123457");
    }

    #[test]
    fn test_nan_round_trips() {
        let text = format_coordinate(f64::NAN, 6);
        assert!(parse_coordinate(&text).is_nan());
    }

    #[test]
    fn test_serializes_with_scalar_names() {
        let viewport = Viewport::new(LngLat::new(-122.0, 37.0), 9.0);
        let json = serde_json::to_value(viewport).unwrap();

        assert_eq!(json["longitude"], -122.0);
        assert_eq!(json["latitude"], 37.0);
        assert_eq!(json["zoom"], 9.0);
    }
}
