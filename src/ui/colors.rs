//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
}

/// Map lifecycle indicator in the top bar.
pub mod status {
    use super::Color32;

    pub const INERT: Color32 = Color32::from_rgb(120, 120, 130);
    pub const LOADING: Color32 = Color32::from_rgb(255, 180, 50);
    pub const LOADED: Color32 = Color32::from_rgb(100, 200, 100);
}

/// Per-event colors in the event log.
pub mod events {
    use super::Color32;
    use draggable_markers::MapEvent;

    pub fn color(event: MapEvent) -> Color32 {
        match event {
            MapEvent::DragEnd => Color32::from_rgb(255, 160, 80),
            MapEvent::ViewportChanged => Color32::from_rgb(100, 180, 255),
            MapEvent::RotateEnd => Color32::from_rgb(180, 130, 255),
        }
    }
}
