//! Overlay reconciler: external point list <-> live draggable markers.
//!
//! Reconciliation is by replacement. Every tracked marker is removed from
//! the engine before any marker for the new list is created, so a drag
//! completion can only ever refer to a marker built from the current list.

use serde::{Deserialize, Serialize};

use crate::engine::{LngLat, MapEngine, MarkerId, MarkerOptions};
use crate::state::{FieldNames, HostStore, MapEvent, PointList, PointRecord};

/// How a finished drag rewrites the dragged record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragWriteBack {
    /// New record holding only the two coordinate fields.
    #[default]
    Replace,
    /// Copy of the old record with the coordinate fields overwritten.
    Merge,
}

/// A live marker and the index of the point it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub marker: MarkerId,
    pub index: usize,
}

pub struct OverlayReconciler {
    overlays: Vec<Overlay>,
    /// Latest known list; the base for drag write-backs.
    points: PointList,
    fields: FieldNames,
    write_back: DragWriteBack,
}

impl OverlayReconciler {
    pub fn new(write_back: DragWriteBack) -> Self {
        Self {
            overlays: Vec::new(),
            points: PointList::empty(),
            fields: FieldNames::default(),
            write_back,
        }
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    /// Retires every tracked marker and builds one per entry of `points`.
    pub fn reconcile<E: MapEngine>(
        &mut self,
        engine: &mut E,
        points: &PointList,
        fields: &FieldNames,
    ) {
        self.retire_all(engine);

        let overlays: Vec<Overlay> = points
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let marker = engine.add_marker(MarkerOptions {
                    position: record.position(fields),
                    draggable: true,
                    index,
                });
                Overlay { marker, index }
            })
            .collect();

        log::debug!("Reconciled {} overlays", overlays.len());

        self.overlays = overlays;
        self.points = points.clone();
        self.fields = fields.clone();
    }

    /// Removes every tracked marker from the engine.
    pub fn retire_all<E: MapEngine>(&mut self, engine: &mut E) {
        for overlay in self.overlays.drain(..) {
            engine.remove_marker(overlay.marker);
        }
    }

    /// Handles a finished drag. Returns false when the marker is not one of
    /// ours (already retired) or its index no longer exists.
    pub fn finish_drag<H: HostStore>(
        &mut self,
        marker: MarkerId,
        position: LngLat,
        host: &mut H,
    ) -> bool {
        let Some(overlay) = self.overlays.iter().find(|o| o.marker == marker) else {
            log::debug!("Ignoring drag end from untracked marker {:?}", marker);
            return false;
        };
        let index = overlay.index;

        let record = match self.write_back {
            DragWriteBack::Replace => PointRecord::from_position(&self.fields, position),
            DragWriteBack::Merge => {
                let mut record = self.points.get(index).cloned().unwrap_or_default();
                record.set_position(&self.fields, position);
                record
            }
        };

        let Some(points) = self.points.with_replaced(index, record) else {
            log::warn!("Drag end for index {} outside the point list", index);
            return false;
        };

        self.points = points.clone();
        host.set_points(points);
        host.emit(MapEvent::DragEnd);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::test_support::{RecordingEngine, RecordingHost};
    use serde_json::json;
    use std::collections::HashSet;

    fn sample(fields: &FieldNames, n: usize) -> PointList {
        PointList::new(
            (0..n)
                .map(|i| {
                    let (lng, lat) = (format!("-122.{}", i), format!("37.{}", i));
                    PointRecord::with_coordinates(fields, &lng, &lat)
                })
                .collect(),
        )
    }

    #[test]
    fn test_one_overlay_per_point() {
        let fields = FieldNames::default();
        let points = sample(&fields, 4);
        let mut engine = RecordingEngine::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);

        reconciler.reconcile(&mut engine, &points, &fields);

        assert_eq!(engine.markers.len(), 4);
        let indices: HashSet<usize> = engine.markers.values().map(|m| m.index).collect();
        assert_eq!(indices.len(), 4);
        for overlay in reconciler.overlays() {
            let marker = &engine.markers[&overlay.marker];
            assert_eq!(marker.index, overlay.index);
            assert_eq!(marker.position, points[overlay.index].position(&fields));
            assert!(marker.draggable);
        }
    }

    #[test]
    fn test_reconcile_twice_does_not_accumulate() {
        let fields = FieldNames::default();
        let points = sample(&fields, 3);
        let mut engine = RecordingEngine::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);

        reconciler.reconcile(&mut engine, &points, &fields);
        reconciler.reconcile(&mut engine, &points, &fields);

        assert_eq!(engine.markers.len(), 3);
        assert_eq!(engine.removed.len(), 3);
    }

    #[test]
    fn test_retirement_precedes_creation() {
        let fields = FieldNames::default();
        let mut engine = RecordingEngine::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);

        reconciler.reconcile(&mut engine, &sample(&fields, 2), &fields);
        let first_ids: Vec<MarkerId> = reconciler.overlays().iter().map(|o| o.marker).collect();
        engine.log.clear();
        reconciler.reconcile(&mut engine, &sample(&fields, 2), &fields);

        let last_removal = engine.log.iter().rposition(|op| op.starts_with("remove"));
        let first_add = engine.log.iter().position(|op| op.starts_with("add"));
        assert!(last_removal.unwrap() < first_add.unwrap());
        assert!(first_ids
            .iter()
            .all(|id| !engine.markers.contains_key(id)));
    }

    #[test]
    fn test_empty_list() {
        let fields = FieldNames::default();
        let mut engine = RecordingEngine::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);

        reconciler.reconcile(&mut engine, &sample(&fields, 2), &fields);
        reconciler.reconcile(&mut engine, &PointList::empty(), &fields);

        assert!(engine.markers.is_empty());
        assert!(reconciler.overlays().is_empty());
    }

    #[test]
    fn test_malformed_values_place_at_nan() {
        let fields = FieldNames::default();
        let points = PointList::new(vec![PointRecord::with_coordinates(&fields, "abc", "1")]);
        let mut engine = RecordingEngine::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);

        reconciler.reconcile(&mut engine, &points, &fields);

        let marker = engine.markers.values().next().unwrap();
        assert!(marker.position.lng.is_nan());
        assert_eq!(marker.position.lat, 1.0);
    }

    #[test]
    fn test_drag_end_replaces_record() {
        let fields = FieldNames::default();
        let points = PointList::new(vec![PointRecord::with_coordinates(
            &fields, "-122.4194", "37.7949",
        )]);
        let mut engine = RecordingEngine::default();
        let mut host = RecordingHost::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);
        reconciler.reconcile(&mut engine, &points, &fields);

        let marker = reconciler.overlays()[0].marker;
        assert!(reconciler.finish_drag(marker, LngLat::new(-122.40, 37.80), &mut host));

        let written = host.points.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].len(), 2);
        assert_eq!(written[0].position(&fields), LngLat::new(-122.40, 37.80));
        assert_eq!(host.events, vec![MapEvent::DragEnd]);
        // The host's original snapshot is untouched.
        assert_eq!(points[0].coordinate("longitude"), -122.4194);
    }

    #[test]
    fn test_drag_end_replace_drops_extra_fields() {
        let fields = FieldNames::new("lng", "lat");
        let points = PointList::from_json_value(&json!([
            { "lng": "1", "lat": "2", "name": "depot" },
            { "lng": "3", "lat": "4", "name": "store" }
        ]))
        .unwrap();
        let mut engine = RecordingEngine::default();
        let mut host = RecordingHost::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);
        reconciler.reconcile(&mut engine, &points, &fields);

        let marker = reconciler.overlays()[1].marker;
        reconciler.finish_drag(marker, LngLat::new(5.0, 6.0), &mut host);

        let written = host.points.unwrap();
        assert!(written[1].get("name").is_none());
        assert_eq!(written[1].position(&fields), LngLat::new(5.0, 6.0));
        assert_eq!(written[0], points[0]);
    }

    #[test]
    fn test_drag_end_merge_keeps_extra_fields() {
        let fields = FieldNames::default();
        let points = PointList::from_json_value(&json!([
            { "longitude": "1", "latitude": "2", "name": "depot" }
        ]))
        .unwrap();
        let mut engine = RecordingEngine::default();
        let mut host = RecordingHost::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Merge);
        reconciler.reconcile(&mut engine, &points, &fields);

        let marker = reconciler.overlays()[0].marker;
        reconciler.finish_drag(marker, LngLat::new(5.0, 6.0), &mut host);

        let written = host.points.unwrap();
        assert_eq!(written[0].get("name"), Some(&json!("depot")));
        assert_eq!(written[0].position(&fields), LngLat::new(5.0, 6.0));
    }

    #[test]
    fn test_consecutive_drags_build_on_each_other() {
        let fields = FieldNames::default();
        let points = sample(&fields, 2);
        let mut engine = RecordingEngine::default();
        let mut host = RecordingHost::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);
        reconciler.reconcile(&mut engine, &points, &fields);

        let first = reconciler.overlays()[0].marker;
        let second = reconciler.overlays()[1].marker;
        reconciler.finish_drag(first, LngLat::new(1.0, 1.0), &mut host);
        reconciler.finish_drag(second, LngLat::new(2.0, 2.0), &mut host);

        let written = host.points.unwrap();
        assert_eq!(written[0].position(&fields), LngLat::new(1.0, 1.0));
        assert_eq!(written[1].position(&fields), LngLat::new(2.0, 2.0));
        assert_eq!(host.events.len(), 2);
    }

    #[test]
    fn test_drag_from_retired_marker_is_ignored() {
        let fields = FieldNames::default();
        let mut engine = RecordingEngine::default();
        let mut host = RecordingHost::default();
        let mut reconciler = OverlayReconciler::new(DragWriteBack::Replace);

        reconciler.reconcile(&mut engine, &sample(&fields, 1), &fields);
        let stale = reconciler.overlays()[0].marker;
        reconciler.reconcile(&mut engine, &sample(&fields, 1), &fields);

        assert!(!reconciler.finish_drag(stale, LngLat::new(0.0, 0.0), &mut host));
        assert!(host.points.is_none());
        assert!(host.events.is_empty());
    }
}
