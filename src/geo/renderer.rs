//! Geographic rendering.
//!
//! Paints fill layers, marker pins and the background graticule onto the
//! egui canvas.

use super::{GeoFeature, GeoSource, MapProjection};
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Stroke, Vec2};
use geo_types::Coord;

/// Pin head radius in screen pixels.
pub const PIN_RADIUS: f32 = 9.0;
/// Distance from the pin tip to the head center.
pub const PIN_HEIGHT: f32 = 18.0;

/// Renders every feature of a source as a filled layer.
pub fn render_fill_layer(
    painter: &Painter,
    source: &GeoSource,
    projection: &MapProjection,
    fill: Color32,
) {
    let outline = Stroke::new(1.5, fill.to_opaque());

    for feature in &source.features {
        match feature {
            GeoFeature::Point(coord) => {
                painter.circle_filled(projection.geo_to_screen(*coord), 4.0, fill);
            }
            GeoFeature::LineString(coords) => {
                render_line_string(painter, coords, projection, outline, false);
            }
            GeoFeature::Polygon { exterior, holes } => {
                render_polygon(painter, exterior, projection, fill, outline);
                for hole in holes {
                    render_line_string(painter, hole, projection, outline, true);
                }
            }
        }
    }
}

/// Renders a polygon ring as a convex fill plus a closed outline.
fn render_polygon(
    painter: &Painter,
    exterior: &[Coord<f64>],
    projection: &MapProjection,
    fill: Color32,
    outline: Stroke,
) {
    if !ring_visible(exterior, projection) {
        return;
    }

    let mut screen_points: Vec<Pos2> = exterior
        .iter()
        .map(|c| projection.geo_to_screen(*c))
        .collect();
    // Drop the GeoJSON closing vertex; the shape closes itself.
    if screen_points.len() > 1 && screen_points.first() == screen_points.last() {
        screen_points.pop();
    }
    if screen_points.len() < 3 {
        return;
    }

    painter.add(egui::Shape::convex_polygon(
        screen_points.clone(),
        fill,
        Stroke::NONE,
    ));
    painter.add(egui::Shape::closed_line(screen_points, outline));
}

/// Renders a line string (or an unfilled ring when `closed`).
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    projection: &MapProjection,
    stroke: Stroke,
    closed: bool,
) {
    if coords.len() < 2 || !ring_visible(coords, projection) {
        return;
    }

    let screen_points: Vec<Pos2> = coords
        .iter()
        .map(|c| projection.geo_to_screen(*c))
        .collect();

    if closed {
        painter.add(egui::Shape::closed_line(screen_points, stroke));
    } else {
        painter.add(egui::Shape::line(screen_points, stroke));
    }
}

fn ring_visible(coords: &[Coord<f64>], projection: &MapProjection) -> bool {
    let (min_lon, max_lon, min_lat, max_lat) = coords.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), c| {
            (
                min_x.min(c.x),
                max_x.max(c.x),
                min_y.min(c.y),
                max_y.max(c.y),
            )
        },
    );

    projection.bbox_visible(min_lon, min_lat, max_lon, max_lat)
}

/// Renders a marker pin whose tip sits at `tip`, labelled with its index.
pub fn render_marker_pin(
    painter: &Painter,
    tip: Pos2,
    index: usize,
    color: Color32,
    outline: Color32,
    active: bool,
) {
    let head = pin_head(tip);
    let radius = if active { PIN_RADIUS + 2.0 } else { PIN_RADIUS };
    let stroke = Stroke::new(1.5, outline);

    painter.add(egui::Shape::convex_polygon(
        vec![
            tip,
            head + Vec2::new(radius * 0.6, radius * 0.6),
            head + Vec2::new(-radius * 0.6, radius * 0.6),
        ],
        color,
        Stroke::NONE,
    ));
    painter.circle(head, radius, color, stroke);
    painter.text(
        head,
        Align2::CENTER_CENTER,
        index.to_string(),
        FontId::proportional(10.0),
        outline,
    );
}

/// Center of a pin's head given its tip.
pub fn pin_head(tip: Pos2) -> Pos2 {
    tip - Vec2::new(0.0, PIN_HEIGHT)
}

/// True when `pointer` is over the pin whose tip is at `tip`.
pub fn pin_contains(tip: Pos2, pointer: Pos2) -> bool {
    let head = pin_head(tip);
    head.distance(pointer) <= PIN_RADIUS + 2.0
        || (pointer.y <= tip.y
            && pointer.y >= head.y
            && (pointer.x - tip.x).abs() <= PIN_RADIUS * 0.6)
}

/// Upper bound on lines drawn per axis.
const MAX_GRATICULE_LINES: usize = 512;

/// Draws meridians and parallels at a spacing suited to the zoom level.
pub fn render_graticule(painter: &Painter, projection: &MapProjection, color: Color32) {
    let spacing = graticule_spacing(projection.zoom);
    let (min_lon, min_lat, max_lon, max_lat) = projection.visible_bounds();
    let stroke = Stroke::new(0.5, color);

    for lon in graticule_lines(min_lon, max_lon, spacing) {
        painter.line_segment(
            [
                projection.geo_to_screen(Coord { x: lon, y: min_lat }),
                projection.geo_to_screen(Coord { x: lon, y: max_lat }),
            ],
            stroke,
        );
    }

    for lat in graticule_lines(min_lat, max_lat, spacing) {
        painter.line_segment(
            [
                projection.geo_to_screen(Coord { x: min_lon, y: lat }),
                projection.geo_to_screen(Coord { x: max_lon, y: lat }),
            ],
            stroke,
        );
    }
}

/// Multiples of `spacing` covering `[min, max]`. Empty when the range is not
/// finite or would need more than [`MAX_GRATICULE_LINES`] lines.
fn graticule_lines(min: f64, max: f64, spacing: f64) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite() && spacing > 0.0) || min > max {
        return Vec::new();
    }
    let first = (min / spacing).floor();
    let count = (max / spacing).floor() - first + 1.0;
    if !(count.is_finite() && count <= MAX_GRATICULE_LINES as f64) {
        log::trace!("Skipping graticule over [{}, {}]", min, max);
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| (first + i as f64) * spacing)
        .collect()
}

/// Degrees between graticule lines: roughly eight lines across the screen.
fn graticule_spacing(zoom: f64) -> f64 {
    const STEPS: [f64; 9] = [30.0, 10.0, 5.0, 1.0, 0.5, 0.1, 0.05, 0.01, 0.005];
    let span = 360.0 / 2f64.powf(zoom);
    STEPS
        .iter()
        .copied()
        .find(|step| span / step >= 4.0)
        .unwrap_or(0.001)
}
