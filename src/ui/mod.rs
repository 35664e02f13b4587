//! UI modules for the Draggable Markers demo host.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, map status, and marker count
//! - Left panel: Inspector for every host binding
//! - Central canvas: The map
//! - Bottom panel: Notification event log

mod bottom_panel;
mod canvas;
mod colors;
mod left_panel;
mod top_bar;

pub use bottom_panel::render_bottom_panel;
pub use canvas::render_canvas;
pub use left_panel::{render_left_panel, InspectorBuffers};
pub use top_bar::render_top_bar;
