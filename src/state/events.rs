//! Notification events and the host write-back boundary.

use super::{PointList, Viewport};

/// Fire-and-forget notifications emitted to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEvent {
    /// A marker drag finished and the point list was replaced.
    DragEnd,
    /// A pan/zoom gesture settled.
    ViewportChanged,
    /// A rotation gesture settled.
    RotateEnd,
}

impl MapEvent {
    /// Event name as registered with the host.
    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::DragEnd => "on-drag-end",
            MapEvent::ViewportChanged => "on-viewport-changed",
            MapEvent::RotateEnd => "on-rotate-end",
        }
    }

    pub fn all() -> &'static [MapEvent] {
        &[
            MapEvent::DragEnd,
            MapEvent::ViewportChanged,
            MapEvent::RotateEnd,
        ]
    }
}

impl std::fmt::Display for MapEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Setters the core may invoke on the host state store.
///
/// The host owns every value; the core never reads back through this trait.
/// New values become visible to the core on the host's next replay.
pub trait HostStore {
    fn set_longitude(&mut self, longitude: String);

    fn set_latitude(&mut self, latitude: String);

    fn set_zoom(&mut self, zoom: f64);

    /// Always a full replacement list, never a patch.
    fn set_points(&mut self, points: PointList);

    fn set_viewport(&mut self, viewport: Viewport);

    fn emit(&mut self, event: MapEvent);
}
