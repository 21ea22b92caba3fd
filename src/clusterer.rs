//! # Clusterer module
//!
//! One level of agglomeration: given the `PointStore`/`KDBush` pair for a
//! finer zoom, decide which points are close enough to merge and produce
//! the `PointStore` for the next zoom up. `index::load` drives this
//! repeatedly from `max_zoom + 1` down to `min_zoom`, building the full
//! hierarchy one level at a time.

use geojson::JsonObject;

use crate::aggregate::Aggregator;
use crate::identity;
use crate::kdbush::KDBush;
use crate::point_store::{PointStore, Props};

/// Build a KD-tree over a store's current point positions.
pub fn build_tree(store: &PointStore, node_size: usize) -> KDBush {
    let points: Vec<(f64, f64)> = store.x.iter().copied().zip(store.y.iter().copied()).collect();
    KDBush::build(&points, node_size)
}

/// A contribution a point/cluster hands up to an absorbing cluster: its own
/// aggregate if it already has one, otherwise seeded from its raw
/// properties via `map`.
fn contribution(props: &Props, aggregator: &Aggregator) -> JsonObject {
    match props {
        Props::Raw(raw) => aggregator.seed(raw),
        Props::Aggregate(aggregate) => aggregate.clone(),
        Props::None => aggregator.seed(&JsonObject::new()),
    }
}

/// Cluster every not-yet-visited point/cluster in `finer` against its own
/// `tree` at `zoom`, absorbing neighbors within `radius` pixels (at
/// `extent`) into a new coarser point when at least `min_points` would
/// result. `finer.zoom`/`finer.parent` are updated in place to mark what
/// was visited and who absorbed it; the coarser `PointStore` for the next
/// zoom up is returned.
///
/// `base` is the number of raw input features, and is the cluster id
/// encoding's offset (see [`identity`]).
#[allow(clippy::too_many_arguments)]
pub fn cluster(
    finer: &mut PointStore,
    tree: &KDBush,
    zoom: u8,
    radius: f64,
    extent: f64,
    min_points: u8,
    base: u64,
    aggregator: Option<&Aggregator>,
) -> PointStore {
    let r = radius / (extent * 2f64.powi(zoom as i32));
    let origin_zoom = zoom + 1;

    let mut coarser = PointStore::with_capacity(finer.len());

    for i in 0..finer.len() {
        if finer.zoom[i] <= zoom as f64 {
            continue;
        }
        finer.zoom[i] = zoom as f64;

        let x = finer.x[i];
        let y = finer.y[i];
        let neighbor_ids = tree.within(x, y, r);

        let num_points_origin = finer.num_points[i];
        let mut num_points = num_points_origin;

        for &nid in &neighbor_ids {
            if finer.zoom[nid] > zoom as f64 {
                num_points += finer.num_points[nid];
            }
        }

        if num_points > num_points_origin && num_points >= min_points as u32 {
            let mut wx = x * num_points_origin as f64;
            let mut wy = y * num_points_origin as f64;
            let cluster_id = identity::encode(i, origin_zoom, base);

            let mut accumulator = aggregator.map(|a| contribution(&finer.props[i], a));

            for nid in neighbor_ids {
                if finer.zoom[nid] <= zoom as f64 {
                    continue;
                }
                finer.zoom[nid] = zoom as f64;

                let num_points2 = finer.num_points[nid];
                wx += finer.x[nid] * num_points2 as f64;
                wy += finer.y[nid] * num_points2 as f64;
                finer.parent[nid] = cluster_id as i64;

                if let (Some(agg), Some(acc)) = (aggregator, accumulator.as_mut()) {
                    agg.fold(acc, &contribution(&finer.props[nid], agg));
                }
            }

            finer.parent[i] = cluster_id as i64;

            let props = match accumulator {
                Some(acc) => Props::Aggregate(acc),
                None => Props::None,
            };

            coarser.push_cluster(wx / num_points as f64, wy / num_points as f64, i, num_points, props);
        } else {
            coarser.push_survivor(finer, i);

            if num_points > 1 {
                for nid in neighbor_ids {
                    if finer.zoom[nid] <= zoom as f64 {
                        continue;
                    }
                    finer.zoom[nid] = zoom as f64;
                    coarser.push_survivor(finer, nid);
                }
            }
        }
    }

    coarser
}
