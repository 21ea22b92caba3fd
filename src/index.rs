//! # Index module
//!
//! The `ZoomCluster` struct: configuration, loaded input features, and the
//! per-zoom `PointStore`/`KDBush` hierarchy built by [`ZoomCluster::load`].
//! Everything in [`crate::query`] reads this hierarchy; nothing after
//! `load` mutates it.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use geojson::{Feature, Value::Point};
use twox_hash::XxHash64;

#[cfg(feature = "log")]
use log::debug;

use crate::builder::{FeatureBuilder, ZoomClusterBuilder, ZoomClusterOptions};
use crate::clusterer;
use crate::error::ZoomClusterError;
use crate::point_store::{PointStore, Props};
use crate::projection;
use crate::{kdbush::KDBush, ClusterId};

/// A clustering configuration together with the hierarchy of per-zoom
/// indexes built by [`ZoomCluster::load`].
#[derive(Clone, Debug)]
pub struct ZoomCluster {
    /// Configuration settings.
    pub options: ZoomClusterOptions,

    /// Input features, in load order; a leaf's `PointStore::index` is its
    /// position in this vector.
    pub points: Vec<Feature>,

    /// One `PointStore` per zoom in `[min_zoom, max_zoom + 1]`, keyed by
    /// zoom level.
    pub stores: HashMap<u8, PointStore, BuildHasherDefault<XxHash64>>,

    /// One `KDBush` per zoom in `[min_zoom, max_zoom + 1]`, built over the
    /// matching store's positions.
    pub trees: HashMap<u8, KDBush, BuildHasherDefault<XxHash64>>,

    /// Number of input features, and the offset cluster ids are encoded
    /// relative to (see [`crate::identity`]).
    pub base: u64,
}

impl ZoomCluster {
    /// Create a new configuration builder.
    pub fn builder() -> ZoomClusterBuilder {
        ZoomClusterBuilder::new()
    }

    /// Create a new feature builder.
    pub fn feature_builder() -> FeatureBuilder {
        FeatureBuilder::new()
    }

    /// Create a new, empty index with the given configuration.
    pub fn new(options: ZoomClusterOptions) -> Self {
        #[cfg(feature = "log")]
        debug!("creating a new zoomcluster index");

        ZoomCluster {
            options,
            points: vec![],
            stores: HashMap::default(),
            trees: HashMap::default(),
            base: 0,
        }
    }

    /// Load `points` and build the full zoom hierarchy: a leaf `PointStore`
    /// at `max_zoom + 1`, then one coarser level per zoom down to
    /// `min_zoom`, each produced by clustering the level above it.
    ///
    /// Returns [`ZoomClusterError::InvalidInput`] the first time a feature
    /// lacks point geometry or carries a non-finite coordinate, rather than
    /// silently dropping it.
    pub fn load(&mut self, points: Vec<Feature>) -> Result<&mut Self, ZoomClusterError> {
        #[cfg(feature = "log")]
        debug!("loading {} input features", points.len());

        let min_zoom = self.options.min_zoom;
        let max_zoom = self.options.max_zoom;
        let leaf_zoom = max_zoom + 1;

        self.base = points.len() as u64;

        let mut leaves = PointStore::with_capacity(points.len());
        for (i, feature) in points.iter().enumerate() {
            let coordinates = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Point(coordinates)) => coordinates,
                _ => {
                    return Err(ZoomClusterError::InvalidInput(format!(
                        "feature {i} has no point geometry"
                    )))
                }
            };

            if coordinates.len() < 2 || !coordinates[0].is_finite() || !coordinates[1].is_finite() {
                return Err(ZoomClusterError::InvalidInput(format!(
                    "feature {i} has non-finite or incomplete coordinates"
                )));
            }

            let (x, y) = projection::project(coordinates[0], coordinates[1]);
            let props = match &feature.properties {
                Some(properties) => Props::Raw(properties.clone()),
                None => Props::None,
            };
            let id = if self.options.generate_id { Some(i as i64) } else { None };

            leaves.push_leaf(x, y, i, props, id);
        }

        self.points = points;

        let leaf_tree = clusterer::build_tree(&leaves, self.options.node_size);
        self.stores.insert(leaf_zoom, leaves);
        self.trees.insert(leaf_zoom, leaf_tree);

        for zoom in (min_zoom..=max_zoom).rev() {
            let next_zoom = zoom + 1;

            #[cfg(feature = "log")]
            debug!("clustering at zoom {zoom}");

            let tree = self
                .trees
                .get(&next_zoom)
                .cloned()
                .ok_or(ZoomClusterError::InvalidZoom(next_zoom))?;

            let finer = self
                .stores
                .get_mut(&next_zoom)
                .ok_or(ZoomClusterError::InvalidZoom(next_zoom))?;

            let coarser = clusterer::cluster(
                finer,
                &tree,
                zoom,
                self.options.radius,
                self.options.extent,
                self.options.min_points,
                self.base,
                self.options.aggregator.as_ref(),
            );

            let coarser_tree = clusterer::build_tree(&coarser, self.options.node_size);
            self.stores.insert(zoom, coarser);
            self.trees.insert(zoom, coarser_tree);
        }

        Ok(self)
    }

    /// Clamp `zoom` into `[min_zoom, max_zoom + 1]`.
    pub fn limit_zoom(&self, zoom: u8) -> u8 {
        zoom.max(self.options.min_zoom).min(self.options.max_zoom + 1)
    }

    /// Decode a cluster id into `(origin_zoom, origin_slot)`.
    pub fn decode(&self, cluster_id: ClusterId) -> (u8, usize) {
        crate::identity::decode(cluster_id, self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nearby_points() -> Vec<Feature> {
        ZoomCluster::feature_builder()
            .add_points(vec![vec![0.0, 0.0], vec![0.0001, 0.0001]])
            .build()
    }

    #[test]
    fn load_builds_a_store_per_zoom() {
        let options = ZoomCluster::builder().min_zoom(0).max_zoom(4).build();
        let mut index = ZoomCluster::new(options);
        index.load(two_nearby_points()).unwrap();

        for zoom in 0..=5u8 {
            assert!(index.stores.contains_key(&zoom), "missing store for zoom {zoom}");
            assert!(index.trees.contains_key(&zoom), "missing tree for zoom {zoom}");
        }
    }

    #[test]
    fn nearby_points_collapse_at_low_zoom() {
        let options = ZoomCluster::builder().min_zoom(0).max_zoom(16).build();
        let mut index = ZoomCluster::new(options);
        index.load(two_nearby_points()).unwrap();

        assert_eq!(index.stores[&0].len(), 1);
        assert_eq!(index.stores[&17].len(), 2);
    }

    #[test]
    fn missing_geometry_is_rejected() {
        let options = ZoomCluster::builder().build();
        let mut index = ZoomCluster::new(options);

        let feature = Feature {
            id: None,
            bbox: None,
            foreign_members: None,
            geometry: None,
            properties: None,
        };

        match index.load(vec![feature]) {
            Err(ZoomClusterError::InvalidInput(message)) => {
                assert_eq!(message, "feature 0 has no point geometry");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        use geojson::{Geometry, Value};

        let options = ZoomCluster::builder().build();
        let mut index = ZoomCluster::new(options);

        let feature = Feature {
            id: None,
            bbox: None,
            foreign_members: None,
            geometry: Some(Geometry::new(Value::Point(vec![f64::NAN, 0.0]))),
            properties: None,
        };

        assert!(matches!(
            index.load(vec![feature]),
            Err(ZoomClusterError::InvalidInput(_))
        ));
    }
}
