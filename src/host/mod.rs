//! The demo host: owns every binding value and receives write-backs.

mod event_log;
pub mod settings;
pub mod url_state;

pub use event_log::{EventEntry, EventLog};
pub use settings::HostSettings;

use draggable_markers::{HostStore, MapBindings, MapEvent, PointList, Viewport};

/// Host-side state store. Write-backs land in `settings.bindings` and are
/// replayed into the map on the next frame.
pub struct HostState {
    pub settings: HostSettings,
    /// Last published viewport snapshot.
    pub viewport: Option<Viewport>,
    pub events: EventLog,
    /// Settings changed since the last save.
    pub dirty: bool,
}

impl HostState {
    pub fn new(settings: HostSettings) -> Self {
        Self {
            settings,
            viewport: None,
            events: EventLog::default(),
            dirty: false,
        }
    }

    pub fn bindings(&self) -> &MapBindings {
        &self.settings.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut MapBindings {
        self.dirty = true;
        &mut self.settings.bindings
    }

    fn describe(&self, event: MapEvent) -> String {
        let bindings = &self.settings.bindings;
        match event {
            MapEvent::DragEnd => format!("{} points", bindings.points.len()),
            MapEvent::ViewportChanged | MapEvent::RotateEnd => format!(
                "{}, {} @ z{:.2}",
                bindings.longitude, bindings.latitude, bindings.zoom
            ),
        }
    }
}

impl HostStore for HostState {
    fn set_longitude(&mut self, longitude: String) {
        self.bindings_mut().longitude = longitude;
    }

    fn set_latitude(&mut self, latitude: String) {
        self.bindings_mut().latitude = latitude;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.bindings_mut().zoom = zoom;
    }

    fn set_points(&mut self, points: PointList) {
        self.bindings_mut().points = points;
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn emit(&mut self, event: MapEvent) {
        let detail = self.describe(event);
        log::info!("{}: {}", event, detail);
        self.events.push(event, detail);
        if event != MapEvent::DragEnd {
            url_state::push_to_url(&self.settings.bindings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draggable_markers::LngLat;

    #[test]
    fn test_write_backs_update_bindings() {
        let mut host = HostState::new(HostSettings::default());

        host.set_longitude("-1.000000".to_string());
        host.set_latitude("2.000000".to_string());
        host.set_zoom(3.0);
        host.set_viewport(Viewport::new(LngLat::new(-1.0, 2.0), 3.0));
        host.emit(MapEvent::ViewportChanged);

        assert!(host.dirty);
        assert_eq!(host.bindings().longitude, "-1.000000");
        assert_eq!(host.bindings().zoom, 3.0);
        assert_eq!(host.viewport.map(|v| v.zoom), Some(3.0));
        let entry = host.events.iter().next().unwrap();
        assert_eq!(entry.event, MapEvent::ViewportChanged);
        assert_eq!(entry.detail, "-1.000000, 2.000000 @ z3.00");
    }

    #[test]
    fn test_drag_end_detail_counts_points() {
        let mut host = HostState::new(HostSettings::default());

        host.set_points(PointList::empty());
        host.emit(MapEvent::DragEnd);

        assert_eq!(host.events.iter().next().unwrap().detail, "0 points");
    }
}
