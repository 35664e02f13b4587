//! Rolling log of notification events received from the map.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use draggable_markers::MapEvent;

/// Entries kept before the oldest is dropped.
pub const EVENT_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
pub struct EventEntry {
    pub at: DateTime<Local>,
    pub event: MapEvent,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<EventEntry>,
    total: usize,
}

impl EventLog {
    pub fn push(&mut self, event: MapEvent, detail: String) {
        if self.entries.len() == EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(EventEntry {
            at: Local::now(),
            event,
            detail,
        });
        self.total += 1;
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Events received since start, including dropped ones.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, event: MapEvent) -> usize {
        self.entries.iter().filter(|e| e.event == event).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_and_order() {
        let mut log = EventLog::default();
        for i in 0..EVENT_LOG_CAPACITY + 5 {
            log.push(MapEvent::ViewportChanged, i.to_string());
        }
        log.push(MapEvent::DragEnd, "last".to_string());

        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.total(), EVENT_LOG_CAPACITY + 6);
        assert_eq!(log.iter().next().map(|e| e.detail.as_str()), Some("last"));
        assert_eq!(log.count(MapEvent::DragEnd), 1);
    }
}
