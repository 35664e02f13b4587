//! Map projection and coordinate transformation.
//!
//! Converts between geographic coordinates (lon/lat) and screen
//! coordinates for the canvas engine's camera.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use glam::DVec2;

/// Size in pixels of one tile at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Latitudes past this are clamped when panning.
pub const MAX_LATITUDE: f64 = 85.0;

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center longitude of the view
    pub center_lon: f64,
    /// Center latitude of the view
    pub center_lat: f64,
    /// Web-map zoom level (each step doubles the scale)
    pub zoom: f64,
    /// Clockwise rotation of the map in degrees
    pub bearing: f64,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center_lon: 0.0,
            center_lat: 0.0,
            zoom: 1.0,
            bearing: 0.0,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    pub fn new(center: Coord<f64>, zoom: f64) -> Self {
        Self {
            center_lon: center.x,
            center_lat: center.y,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..Default::default()
        }
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: self.center_lon,
            y: self.center_lat,
        }
    }

    /// Screen pixels per degree of latitude at the current zoom.
    pub fn pixels_per_degree(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom) / 360.0
    }

    fn lat_correction(&self) -> f64 {
        // Keep the correction away from zero so screen_to_geo stays finite.
        self.center_lat.to_radians().cos().max(0.01)
    }

    fn rotation(&self) -> DVec2 {
        DVec2::from_angle(-self.bearing.to_radians())
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    ///
    /// Equirectangular projection with a longitude correction taken at the
    /// center latitude, rotated by the bearing.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let ppd = self.pixels_per_degree();
        let offset = DVec2::new(
            (coord.x - self.center_lon) * self.lat_correction() * ppd,
            -(coord.y - self.center_lat) * ppd,
        );
        // The map turns counter to the bearing so the bearing points up.
        let rotated = self.rotation().rotate(offset);
        let center = self.screen_rect.center();

        Pos2::new(center.x + rotated.x as f32, center.y + rotated.y as f32)
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let ppd = self.pixels_per_degree();
        let center = self.screen_rect.center();
        let rotated = DVec2::new((pos.x - center.x) as f64, (pos.y - center.y) as f64);
        let inverse = DVec2::new(self.rotation().x, -self.rotation().y);
        let offset = inverse.rotate(rotated);

        Coord {
            x: self.center_lon + offset.x / (self.lat_correction() * ppd),
            y: self.center_lat - offset.y / ppd,
        }
    }

    /// Moves the center so the map follows a pointer drag of `delta` pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        let target = self.screen_to_geo(self.screen_rect.center() - delta);
        self.center_lon = wrap_longitude(target.x);
        self.center_lat = target.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    }

    /// Changes zoom by `delta` levels keeping the point under `anchor` fixed.
    pub fn zoom_around(&mut self, anchor: Pos2, delta: f64) {
        let before = self.screen_to_geo(anchor);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);

        // Latitude first: the longitude scale depends on the center latitude.
        let after = self.screen_to_geo(anchor);
        self.center_lat = (self.center_lat + before.y - after.y).clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let after = self.screen_to_geo(anchor);
        self.center_lon = wrap_longitude(self.center_lon + before.x - after.x);
    }

    /// Rotates the map by `degrees` clockwise.
    pub fn rotate_by(&mut self, degrees: f64) {
        self.bearing = normalize_bearing(self.bearing + degrees);
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let corners = [
            self.screen_to_geo(self.screen_rect.left_top()),
            self.screen_to_geo(self.screen_rect.right_top()),
            self.screen_to_geo(self.screen_rect.left_bottom()),
            self.screen_to_geo(self.screen_rect.right_bottom()),
        ];

        corners.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), c| {
                (min_x.min(c.x), min_y.min(c.y), max_x.max(c.x), max_y.max(c.y))
            },
        )
    }

    /// Checks if a bounding box intersects with the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();

        !(max_lon < vis_min_lon
            || min_lon > vis_max_lon
            || max_lat < vis_min_lat
            || min_lat > vis_max_lat)
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) || !lon.is_finite() {
        return lon;
    }
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

fn normalize_bearing(bearing: f64) -> f64 {
    let b = (bearing + 180.0).rem_euclid(360.0) - 180.0;
    if b == -180.0 {
        180.0
    } else {
        b
    }
}
