//! Map marker reconciliation.
//!
//! A [`ViewportReconciler`] owns the mapping from position key to marker
//! handle for one map instance and brings it in line with each new batch of
//! reports using the minimal set of add/remove operations. Markers whose key
//! survives a batch are left alone, so their handles stay identical.

use crate::report::TrafficReport;
use clearway_geo::{PositionKey, MARKER_KEY_DECIMALS};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The rendering side of a map: creates and destroys markers.
pub trait MarkerLayer {
    /// Opaque marker identity.
    type Handle;

    /// Places a marker for `report` and returns its handle.
    fn add_marker(&mut self, report: &TrafficReport) -> Self::Handle;

    /// Removes a marker previously returned by [`MarkerLayer::add_marker`].
    fn remove_marker(&mut self, handle: Self::Handle);
}

/// Operations needed to move from the current marker set to a desired one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportDiff {
    /// Keys to create, with the report that should back each marker
    pub to_add: Vec<(PositionKey, TrafficReport)>,
    /// Keys whose markers should be removed
    pub to_remove: Vec<PositionKey>,
}

impl ViewportDiff {
    /// True when the marker set is already current.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of marker operations.
    pub fn op_count(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// Outcome of a [`ViewportReconciler::sync`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Markers created
    pub added: usize,
    /// Markers removed
    pub removed: usize,
    /// Markers left untouched
    pub kept: usize,
}

/// Keeps one map's markers in step with the latest report batch.
#[derive(Debug)]
pub struct ViewportReconciler<H> {
    markers: BTreeMap<PositionKey, H>,
    key_decimals: u32,
}

impl<H> Default for ViewportReconciler<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> ViewportReconciler<H> {
    /// Reconciler keyed at the standard marker precision.
    pub fn new() -> Self {
        Self::with_key_decimals(MARKER_KEY_DECIMALS)
    }

    /// Reconciler keyed at a custom precision.
    pub fn with_key_decimals(key_decimals: u32) -> Self {
        Self {
            markers: BTreeMap::new(),
            key_decimals,
        }
    }

    /// Computes the diff between the current markers and `reports`.
    ///
    /// Reports with invalid positions are ignored. When several reports share
    /// a key the first one backs the marker.
    pub fn reconcile(&self, reports: &[TrafficReport]) -> ViewportDiff {
        let mut desired = BTreeSet::new();
        let mut to_add = Vec::new();

        for report in reports {
            let Some(key) = PositionKey::new(&report.coordinate(), self.key_decimals) else {
                continue;
            };
            if !desired.insert(key.clone()) {
                continue;
            }
            if !self.markers.contains_key(&key) {
                to_add.push((key, report.clone()));
            }
        }

        let to_remove = self
            .markers
            .keys()
            .filter(|key| !desired.contains(*key))
            .cloned()
            .collect();

        ViewportDiff { to_add, to_remove }
    }

    /// Applies the diff for `reports` to `layer`.
    ///
    /// Afterwards the tracked keys equal the desired keys exactly; an empty
    /// batch clears the map.
    pub fn sync<L>(&mut self, layer: &mut L, reports: &[TrafficReport]) -> SyncSummary
    where
        L: MarkerLayer<Handle = H>,
    {
        let diff = self.reconcile(reports);
        let mut summary = SyncSummary::default();

        for key in diff.to_remove {
            if let Some(handle) = self.markers.remove(&key) {
                layer.remove_marker(handle);
                summary.removed += 1;
            }
        }
        for (key, report) in diff.to_add {
            let handle = layer.add_marker(&report);
            self.markers.insert(key, handle);
            summary.added += 1;
        }
        summary.kept = self.markers.len() - summary.added;

        debug!(
            added = summary.added,
            removed = summary.removed,
            kept = summary.kept,
            "Viewport synced"
        );
        summary
    }

    /// Removes every marker.
    pub fn clear<L>(&mut self, layer: &mut L)
    where
        L: MarkerLayer<Handle = H>,
    {
        for (_, handle) in std::mem::take(&mut self.markers) {
            layer.remove_marker(handle);
        }
    }

    /// Number of tracked markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers are tracked.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Tracked keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &PositionKey> {
        self.markers.keys()
    }

    /// Handle of the marker at `key`, if tracked.
    pub fn handle_for(&self, key: &PositionKey) -> Option<&H> {
        self.markers.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Layer that hands out sequential ids and records every call.
    #[derive(Default)]
    struct RecordingLayer {
        next: u32,
        live: BTreeSet<u32>,
        ops: usize,
    }

    impl MarkerLayer for RecordingLayer {
        type Handle = u32;

        fn add_marker(&mut self, _report: &TrafficReport) -> u32 {
            self.next += 1;
            self.live.insert(self.next);
            self.ops += 1;
            self.next
        }

        fn remove_marker(&mut self, handle: u32) {
            assert!(self.live.remove(&handle), "removed unknown handle {handle}");
            self.ops += 1;
        }
    }

    fn report(id: &str, lat: f64, lng: f64) -> TrafficReport {
        TrafficReport::new(id, lat, lng)
    }

    fn key(lat: f64, lng: f64) -> PositionKey {
        PositionKey::marker(&clearway_geo::Coordinate::new(lat, lng)).unwrap()
    }

    #[test]
    fn test_shared_markers_keep_their_handle() {
        let mut layer = RecordingLayer::default();
        let mut viewport = ViewportReconciler::new();
        let a = report("a", 49.1, -123.1);
        let b = report("b", 49.2, -123.2);
        let c = report("c", 49.3, -123.3);

        viewport.sync(&mut layer, &[a.clone(), b]);
        let handle_a = *viewport.handle_for(&key(49.1, -123.1)).unwrap();
        assert_eq!(layer.ops, 2);

        let summary = viewport.sync(&mut layer, &[a, c]);
        // B removed and C added; A is neither removed nor re-added
        assert_eq!(layer.ops, 4);
        assert_eq!(summary, SyncSummary { added: 1, removed: 1, kept: 1 });
        assert_eq!(*viewport.handle_for(&key(49.1, -123.1)).unwrap(), handle_a);
        assert!(viewport.handle_for(&key(49.2, -123.2)).is_none());
    }

    #[test]
    fn test_empty_batch_clears() {
        let mut layer = RecordingLayer::default();
        let mut viewport = ViewportReconciler::new();
        viewport.sync(&mut layer, &[report("a", 1.0, 1.0), report("b", 2.0, 2.0)]);

        let summary = viewport.sync(&mut layer, &[]);
        assert_eq!(summary.removed, 2);
        assert!(viewport.is_empty());
        assert!(layer.live.is_empty());
    }

    #[test]
    fn test_duplicates_and_invalid_positions_collapse() {
        let mut layer = RecordingLayer::default();
        let mut viewport = ViewportReconciler::new();
        let batch = [
            report("a", 49.28271, -123.12069),
            report("b", 49.28268, -123.12072),
            report("bad", f64::NAN, 0.0),
            report("far", 91.0, 0.0),
        ];
        let summary = viewport.sync(&mut layer, &batch);
        assert_eq!(summary.added, 1);
        assert_eq!(viewport.len(), 1);
    }

    #[test]
    fn test_repeated_sync_is_idempotent() {
        let mut layer = RecordingLayer::default();
        let mut viewport = ViewportReconciler::new();
        let batch = [report("a", 1.0, 1.0), report("b", 2.0, 2.0)];
        viewport.sync(&mut layer, &batch);

        assert!(viewport.reconcile(&batch).is_empty());
        let summary = viewport.sync(&mut layer, &batch);
        assert_eq!(summary, SyncSummary { added: 0, removed: 0, kept: 2 });
        assert_eq!(layer.ops, 2);
    }

    #[test]
    fn test_keys_match_desired_set() {
        let mut layer = RecordingLayer::default();
        let mut viewport = ViewportReconciler::new();
        viewport.sync(&mut layer, &[report("a", 1.0, 1.0), report("b", 2.0, 2.0)]);
        viewport.sync(&mut layer, &[report("c", 3.0, 3.0), report("b", 2.0, 2.0)]);

        let keys: Vec<_> = viewport.keys().map(PositionKey::as_str).collect();
        assert_eq!(keys, ["2.0000,2.0000", "3.0000,3.0000"]);
        assert_eq!(layer.live.len(), 2);

        viewport.clear(&mut layer);
        assert!(layer.live.is_empty());
    }
}
