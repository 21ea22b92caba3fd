//! # PointStore module
//!
//! Parallel arrays holding per-point state for one zoom level. A fresh
//! `PointStore` is created for every zoom in `[min_zoom, max_zoom + 1]`
//! during `load`, and is immutable once the next coarser level has been
//! derived from it (aside from the `zoom`/`parent` updates the clusterer
//! makes in place as it decides which points survive and which are
//! absorbed).

use geojson::JsonObject;

/// The aggregated or passed-through properties carried by a point or
/// cluster. The core never inspects `Raw`/`Aggregate` contents — it only
/// forwards them to the caller's `map`/`reduce` hooks and echoes them back
/// in query results.
#[derive(Clone, Debug, Default)]
pub enum Props {
    /// No properties (absent on the input feature).
    #[default]
    None,
    /// The original feature's properties, carried through unchanged.
    Raw(JsonObject),
    /// A folded aggregate produced by the caller's `map`/`reduce` hooks.
    Aggregate(JsonObject),
}

/// Per-zoom parallel arrays of point/cluster state. See the module's crate
/// documentation for the meaning of each field; indices into these arrays
/// are referred to as "slots" elsewhere in the crate.
#[derive(Clone, Debug, Default)]
pub struct PointStore {
    /// Mercator x in `[0, 1]`.
    pub x: Vec<f64>,
    /// Mercator y in `[0, 1]`.
    pub y: Vec<f64>,
    /// Zoom at which this slot was absorbed into a coarser cluster;
    /// `f64::INFINITY` while still alive.
    pub zoom: Vec<f64>,
    /// For a leaf: the original feature's index. For a cluster: the slot of
    /// its first absorbed member in the next finer `PointStore`.
    pub index: Vec<usize>,
    /// Slot of the cluster that absorbed this point in the next coarser
    /// `PointStore`, or `-1` if it survives unchanged.
    pub parent: Vec<i64>,
    /// Count of raw points underneath this slot (`1` for a leaf).
    pub num_points: Vec<u32>,
    /// Properties (raw or aggregated).
    pub props: Vec<Props>,
    /// Synthesized integer id, present only for leaves when `generate_id`
    /// is enabled.
    pub id: Vec<Option<i64>>,
}

impl PointStore {
    /// An empty store with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        PointStore {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            zoom: Vec::with_capacity(capacity),
            index: Vec::with_capacity(capacity),
            parent: Vec::with_capacity(capacity),
            num_points: Vec::with_capacity(capacity),
            props: Vec::with_capacity(capacity),
            id: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots in this store.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether this store holds no slots.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Append a leaf slot for a raw input feature at `feature_index`.
    #[allow(clippy::too_many_arguments)]
    pub fn push_leaf(&mut self, x: f64, y: f64, feature_index: usize, props: Props, id: Option<i64>) {
        self.x.push(x);
        self.y.push(y);
        self.zoom.push(f64::INFINITY);
        self.index.push(feature_index);
        self.parent.push(-1);
        self.num_points.push(1);
        self.props.push(props);
        self.id.push(id);
    }

    /// Append a cluster slot, created by agglomerating one or more finer
    /// slots. `origin_slot` is the first absorbed member's slot in the
    /// finer store.
    pub fn push_cluster(&mut self, x: f64, y: f64, origin_slot: usize, num_points: u32, props: Props) {
        self.x.push(x);
        self.y.push(y);
        self.zoom.push(f64::INFINITY);
        self.index.push(origin_slot);
        self.parent.push(-1);
        self.num_points.push(num_points);
        self.props.push(props);
        self.id.push(None);
    }

    /// Append a slot carried over unchanged from the finer store (a point
    /// or cluster that didn't get absorbed at this zoom).
    pub fn push_survivor(&mut self, finer: &PointStore, slot: usize) {
        self.x.push(finer.x[slot]);
        self.y.push(finer.y[slot]);
        self.zoom.push(f64::INFINITY);
        self.index.push(finer.index[slot]);
        self.parent.push(-1);
        self.num_points.push(finer.num_points[slot]);
        self.props.push(finer.props[slot].clone());
        self.id.push(finer.id[slot]);
    }

    /// Whether the slot is a cluster (carries more than one raw point).
    pub fn is_cluster(&self, slot: usize) -> bool {
        self.num_points[slot] > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conservation_across_pushes() {
        let mut finer = PointStore::with_capacity(2);
        finer.push_leaf(0.1, 0.1, 0, Props::None, None);
        finer.push_leaf(0.2, 0.2, 1, Props::None, None);

        let mut coarser = PointStore::with_capacity(1);
        coarser.push_cluster(0.15, 0.15, 0, 2, Props::None);
        coarser.push_survivor(&finer, 1);

        let total: u32 = coarser.num_points.iter().sum();
        assert_eq!(total, 3);
        assert!(coarser.is_cluster(0));
        assert!(!coarser.is_cluster(1));
    }
}
