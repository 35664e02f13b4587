//! Pointer gesture state for the canvas engine.

use std::time::Duration;

use web_time::Instant;

use crate::engine::{LngLat, MarkerId};

/// Quiet period after the last scroll step before a zoom counts as settled.
pub const SCROLL_SETTLE: Duration = Duration::from_millis(150);

/// Degrees of rotation per pixel of horizontal secondary drag.
pub const ROTATE_DEGREES_PER_PIXEL: f64 = 0.5;

/// Scroll pixels per zoom level.
pub const SCROLL_PIXELS_PER_ZOOM: f64 = 500.0;

/// The pointer gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning,
    Rotating,
    DraggingMarker {
        marker: MarkerId,
        position: LngLat,
    },
}

/// Tracks the active gesture and the scroll-zoom settle timer.
#[derive(Debug, Default)]
pub struct GestureTracker {
    gesture: Gesture,
    last_scroll: Option<Instant>,
    touch_rotating: bool,
}

impl GestureTracker {
    pub fn current(&self) -> Gesture {
        self.gesture
    }

    pub fn begin(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    /// Updates the in-flight marker position, if a marker is being dragged.
    pub fn move_marker(&mut self, to: LngLat) -> Option<MarkerId> {
        match &mut self.gesture {
            Gesture::DraggingMarker { marker, position } => {
                *position = to;
                Some(*marker)
            }
            _ => None,
        }
    }

    /// Ends the active gesture and returns it.
    pub fn finish(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }

    /// Drops a marker drag whose marker went away.
    pub fn cancel_marker(&mut self, removed: MarkerId) {
        if matches!(self.gesture, Gesture::DraggingMarker { marker, .. } if marker == removed) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn scrolled(&mut self, now: Instant) {
        self.last_scroll = Some(now);
    }

    pub fn is_scrolling(&self) -> bool {
        self.last_scroll.is_some()
    }

    /// True once, when the scroll zoom has been quiet for [`SCROLL_SETTLE`].
    pub fn scroll_settled(&mut self, now: Instant) -> bool {
        match self.last_scroll {
            Some(last) if now.saturating_duration_since(last) >= SCROLL_SETTLE => {
                self.last_scroll = None;
                true
            }
            _ => false,
        }
    }

    /// Records whether a two-finger rotation is active. Returns true when
    /// one just ended.
    pub fn touch_rotation(&mut self, active: bool) -> bool {
        let ended = self.touch_rotating && !active;
        self.touch_rotating = active;
        ended
    }
}
