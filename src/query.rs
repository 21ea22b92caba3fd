//! # Query module
//!
//! Read-only lookups over an already-[`crate::index::ZoomCluster::load`]ed
//! index: bounding-box cluster lists, tile slices, a cluster's immediate
//! children, the raw leaves under a cluster, and the zoom at which a
//! cluster first splits into more than one child.

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, Value::Point};

use crate::error::ZoomClusterError;
use crate::feature;
use crate::identity;
use crate::index::ZoomCluster;
use crate::projection;
use crate::ClusterId;

/// Normalize a longitude into `[-180, 180)`.
fn normalize_longitude(lng: f64) -> f64 {
    ((((lng + 180.0) % 360.0) + 360.0) % 360.0) - 180.0
}

impl ZoomCluster {
    /// Build the output `Feature` for a slot in the store at `zoom_label`:
    /// a synthesized cluster feature, or the original input feature for a
    /// leaf.
    fn feature_for_slot(&self, zoom_label: u8, slot: usize) -> Feature {
        let store = &self.stores[&zoom_label];

        if store.is_cluster(slot) {
            let cluster_id = identity::encode(store.index[slot], zoom_label + 1, self.base);
            feature::cluster_feature(
                store.x[slot],
                store.y[slot],
                cluster_id,
                store.num_points[slot],
                &store.props[slot],
            )
        } else {
            let mut leaf = self.points[store.index[slot]].clone();
            if let Some(id) = store.id[slot] {
                leaf.id = Some(Id::Number(id.into()));
            }
            leaf
        }
    }

    /// Append the tile-projected features for `ids` (slots in the store at
    /// `zoom_label`) relative to tile `(tile_x, tile_y)` at `z2 = 2^z`.
    fn append_tile_features(
        &self,
        zoom_label: u8,
        ids: &[usize],
        tile_x: f64,
        tile_y: f64,
        z2: f64,
        out: &mut Vec<Feature>,
    ) {
        let store = &self.stores[&zoom_label];

        for &slot in ids {
            if store.is_cluster(slot) {
                let cluster_id = identity::encode(store.index[slot], zoom_label + 1, self.base);
                let (px, py) = feature::project_to_tile(
                    store.x[slot],
                    store.y[slot],
                    tile_x,
                    tile_y,
                    z2,
                    self.options.extent,
                    true,
                );

                out.push(Feature {
                    id: Some(Id::String(cluster_id.to_string())),
                    bbox: None,
                    foreign_members: None,
                    geometry: Some(Geometry::new(Point(vec![px, py]))),
                    properties: Some(feature::cluster_properties(
                        cluster_id,
                        store.num_points[slot],
                        &store.props[slot],
                    )),
                });
            } else {
                let original = &self.points[store.index[slot]];
                let (px, py) = feature::project_to_tile(
                    store.x[slot],
                    store.y[slot],
                    tile_x,
                    tile_y,
                    z2,
                    self.options.extent,
                    false,
                );
                let id = match store.id[slot] {
                    Some(id) => Some(Id::Number(id.into())),
                    None => original.id.clone(),
                };

                out.push(Feature {
                    id,
                    bbox: None,
                    foreign_members: None,
                    geometry: Some(Geometry::new(Point(vec![px, py]))),
                    properties: original.properties.clone(),
                });
            }
        }
    }

    /// Clusters and leaves within `bbox = [min_lng, min_lat, max_lng,
    /// max_lat]` at `zoom`, clamped into the index's configured zoom
    /// range. A bbox that straddles the antimeridian (`min_lng > max_lng`
    /// after normalization) is split into its eastern and western halves
    /// and the results concatenated.
    pub fn get_clusters(&self, bbox: [f64; 4], zoom: u8) -> Result<Vec<Feature>, ZoomClusterError> {
        #[cfg(feature = "log")]
        log::debug!("retrieving clusters for zoom {zoom} and bbox {bbox:?}");

        let zoom_label = self.limit_zoom(zoom);
        let tree = self
            .trees
            .get(&zoom_label)
            .ok_or(ZoomClusterError::InvalidZoom(zoom_label))?;

        let mut min_lng = normalize_longitude(bbox[0]);
        let min_lat = bbox[1].clamp(-90.0, 90.0);
        let mut max_lng = if bbox[2] == 180.0 { 180.0 } else { normalize_longitude(bbox[2]) };
        let max_lat = bbox[3].clamp(-90.0, 90.0);

        if bbox[2] - bbox[0] >= 360.0 {
            min_lng = -180.0;
            max_lng = 180.0;
        } else if min_lng > max_lng {
            let mut eastern = self.get_clusters([min_lng, min_lat, 180.0, max_lat], zoom)?;
            let western = self.get_clusters([-180.0, min_lat, max_lng, max_lat], zoom)?;
            eastern.extend(western);
            return Ok(eastern);
        }

        let (min_x, max_y) = projection::project(min_lng, max_lat);
        let (max_x, min_y) = projection::project(max_lng, min_lat);
        let ids = tree.range(min_x, min_y, max_x, max_y);

        Ok(ids.into_iter().map(|id| self.feature_for_slot(zoom_label, id)).collect())
    }

    /// The features visible in the map tile `(z, x, y)`, projected into
    /// that tile's local pixel space at the configured `extent`. An empty
    /// tile is not an error: a vector tile over open ocean is simply
    /// empty.
    pub fn get_tile(&self, z: u8, x: f64, y: f64) -> Result<FeatureCollection, ZoomClusterError> {
        let zoom_label = self.limit_zoom(z);
        self.trees
            .get(&zoom_label)
            .ok_or(ZoomClusterError::InvalidZoom(zoom_label))?;

        let tree = &self.trees[&zoom_label];
        let z2 = 2f64.powi(z as i32);
        let p = (self.options.radius / self.options.extent).min(1.0);
        let top = (y - p) / z2;
        let bottom = (y + 1.0 + p) / z2;

        let mut features = Vec::new();

        let ids = tree.range((x - p) / z2, top, (x + 1.0 + p) / z2, bottom);
        self.append_tile_features(zoom_label, &ids, x, y, z2, &mut features);

        if x == 0.0 {
            let ids = tree.range(1.0 - p / z2, top, 1.0, bottom);
            self.append_tile_features(zoom_label, &ids, z2, y, z2, &mut features);
        }

        if x == z2 - 1.0 {
            let ids = tree.range(0.0, top, p / z2, bottom);
            self.append_tile_features(zoom_label, &ids, -1.0, y, z2, &mut features);
        }

        #[cfg(feature = "log")]
        log::debug!("retrieved {} features for tile {z}/{x}/{y}", features.len());

        Ok(FeatureCollection {
            bbox: None,
            foreign_members: None,
            features,
        })
    }

    /// The immediate children of a cluster: the points/clusters one zoom
    /// finer that were absorbed directly into it.
    pub fn get_children(&self, cluster_id: ClusterId) -> Result<Vec<Feature>, ZoomClusterError> {
        let (origin_zoom, origin_slot) = self.decode(cluster_id);
        let store = self
            .stores
            .get(&origin_zoom)
            .ok_or(ZoomClusterError::InvalidZoom(origin_zoom))?;
        let tree = self
            .trees
            .get(&origin_zoom)
            .ok_or(ZoomClusterError::InvalidZoom(origin_zoom))?;

        if origin_slot >= store.len() {
            return Err(ZoomClusterError::NotFound(cluster_id));
        }

        let r = self.options.radius / (self.options.extent * 2f64.powf(origin_zoom as f64 - 1.0));
        let x = store.x[origin_slot];
        let y = store.y[origin_slot];
        let ids = tree.within(x, y, r);

        let mut children = Vec::new();
        for slot in ids {
            if store.parent[slot] == cluster_id as i64 {
                children.push(self.feature_for_slot(origin_zoom, slot));
            }
        }

        if children.is_empty() {
            return Err(ZoomClusterError::NotFound(cluster_id));
        }

        Ok(children)
    }

    /// The raw leaf features under a cluster, in depth-first order, with
    /// `offset` skipped and at most `limit` returned.
    pub fn get_leaves(&self, cluster_id: ClusterId, limit: usize, offset: usize) -> Vec<Feature> {
        let mut leaves = Vec::new();
        self.append_leaves(&mut leaves, cluster_id, limit, offset, 0);
        leaves
    }

    /// Depth-first leaf collection, recursing into sub-clusters that
    /// aren't entirely skipped by `offset`. Returns the updated skip
    /// count.
    fn append_leaves(
        &self,
        result: &mut Vec<Feature>,
        cluster_id: ClusterId,
        limit: usize,
        offset: usize,
        mut skipped: usize,
    ) -> usize {
        let children = match self.get_children(cluster_id) {
            Ok(children) => children,
            Err(_) => return skipped,
        };

        for child in children {
            let is_cluster = child.property("cluster").and_then(|v| v.as_bool()).unwrap_or(false);

            if is_cluster {
                let point_count = child
                    .property("point_count")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as usize;

                if skipped + point_count <= offset {
                    skipped += point_count;
                } else if let Some(child_id) = child.property("cluster_id").and_then(|v| v.as_u64()) {
                    skipped = self.append_leaves(result, child_id, limit, offset, skipped);
                }
            } else if skipped < offset {
                skipped += 1;
            } else {
                result.push(child);
            }

            if result.len() == limit {
                break;
            }
        }

        skipped
    }

    /// The zoom at which a cluster first expands into more than one child,
    /// following single-child chains up through the hierarchy.
    pub fn get_cluster_expansion_zoom(&self, mut cluster_id: ClusterId) -> u8 {
        let (origin_zoom, _) = self.decode(cluster_id);
        let mut expansion_zoom = origin_zoom.saturating_sub(1);

        while expansion_zoom <= self.options.max_zoom {
            let children = match self.get_children(cluster_id) {
                Ok(children) => children,
                Err(_) => break,
            };

            expansion_zoom += 1;

            if children.len() != 1 {
                break;
            }

            cluster_id = match children[0].property("cluster_id").and_then(|v| v.as_u64()) {
                Some(id) => id,
                None => break,
            };
        }

        expansion_zoom
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ZoomClusterBuilder;
    use crate::index::ZoomCluster;
    use crate::projection;

    fn grid_points() -> Vec<geojson::Feature> {
        let mut points = Vec::new();
        for lng in [-10.0, -9.999, 10.0] {
            points.push(vec![lng, 0.0]);
        }
        ZoomCluster::feature_builder().add_points(points).build()
    }

    #[test]
    fn get_clusters_finds_everything_at_world_bbox() {
        let options = ZoomClusterBuilder::new().min_zoom(0).max_zoom(16).build();
        let mut index = ZoomCluster::new(options);
        index.load(grid_points()).unwrap();

        let clusters = index.get_clusters([-180.0, -90.0, 180.0, 90.0], 0).unwrap();
        let total: u64 = clusters
            .iter()
            .map(|f| f.property("point_count").and_then(|v| v.as_u64()).unwrap_or(1))
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn get_tile_pad_is_clamped_to_one() {
        // radius=600, extent=500 would give an unclamped pad of 1.2; the
        // spec caps it at 1.0. Place a leaf just inside the unclamped
        // window but outside the clamped one and assert it's excluded.
        let lon = (0.13 - 0.5) * 360.0;
        let lat = projection::unproject_y(0.05);

        let options = ZoomClusterBuilder::new()
            .min_zoom(0)
            .max_zoom(16)
            .radius(600.0)
            .extent(500.0)
            .build();
        let mut index = ZoomCluster::new(options);
        index
            .load(ZoomCluster::feature_builder().add_point(vec![lon, lat]).build())
            .unwrap();

        let tile = index.get_tile(4, 0.0, 0.0).unwrap();
        assert!(tile.features.is_empty(), "pad should be clamped to 1.0, not the unclamped 1.2");
    }

    #[test]
    fn get_tile_is_empty_over_open_ocean() {
        let options = ZoomClusterBuilder::new().min_zoom(0).max_zoom(16).build();
        let mut index = ZoomCluster::new(options);
        index.load(grid_points()).unwrap();

        let tile = index.get_tile(0, 5.0, 5.0).unwrap();
        assert!(tile.features.is_empty());
    }

    #[test]
    fn expansion_zoom_reaches_max_for_isolated_point() {
        let options = ZoomClusterBuilder::new().min_zoom(0).max_zoom(8).build();
        let mut index = ZoomCluster::new(options);
        index.load(ZoomCluster::feature_builder().add_point(vec![0.0, 0.0]).build()).unwrap();

        let clusters = index.get_clusters([-180.0, -90.0, 180.0, 90.0], 0).unwrap();
        assert_eq!(clusters.len(), 1);
        assert!(clusters[0].property("cluster").is_none());
    }

    #[test]
    fn unknown_cluster_id_is_not_found() {
        let options = ZoomClusterBuilder::new().build();
        let mut index = ZoomCluster::new(options);
        index.load(grid_points()).unwrap();

        assert!(index.get_children(999_999).is_err());
    }
}
