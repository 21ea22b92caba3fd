//! # Builder module
//!
//! Chainable builders for the index's configuration options and for
//! constructing input features without hand-writing GeoJSON literals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use geojson::{feature::Id, Feature, Geometry, Value};

use crate::aggregate::{Aggregator, MapFn, ReduceFn};

/// zoomcluster configuration options.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ZoomClusterOptions {
    /// Minimal zoom level to generate clusters on. Default `0`.
    pub min_zoom: u8,

    /// Maximal zoom level to cluster the points on. Default `16`. Must be
    /// `<= 30` (the cluster id encoding reserves 5 bits for the zoom of a
    /// cluster's origin, and leaves live one zoom above `max_zoom`).
    pub max_zoom: u8,

    /// Minimum points required to form a cluster. Default `2`.
    pub min_points: u8,

    /// Cluster radius, in pixels at `extent`. Default `40.0`.
    pub radius: f64,

    /// Tile pixel extent (radius is calculated relative to it, and tile
    /// output coordinates are scaled to it). Default `512.0`.
    pub extent: f64,

    /// Size of a KD-tree leaf node; larger values trade construction cost
    /// for query cost. Default `64`.
    pub node_size: usize,

    /// Synthesize an integer id for each leaf feature that doesn't already
    /// carry one. Default `false`.
    pub generate_id: bool,

    /// Caller-supplied property aggregator. Absent by default, in which
    /// case clusters carry only their synthetic metadata.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub aggregator: Option<Aggregator>,
}

impl Default for ZoomClusterOptions {
    fn default() -> Self {
        ZoomClusterBuilder::new().build()
    }
}

/// Builder for [`ZoomClusterOptions`].
#[derive(Clone, Default)]
pub struct ZoomClusterBuilder {
    min_zoom: Option<u8>,
    max_zoom: Option<u8>,
    min_points: Option<u8>,
    radius: Option<f64>,
    extent: Option<f64>,
    node_size: Option<usize>,
    generate_id: Option<bool>,
    map: Option<MapFn>,
    reduce: Option<ReduceFn>,
}

impl ZoomClusterBuilder {
    /// Create a new options builder.
    pub fn new() -> Self {
        ZoomClusterBuilder::default()
    }

    /// Set the minimal zoom level to generate clusters on.
    pub fn min_zoom(mut self, min_zoom: u8) -> Self {
        self.min_zoom = Some(min_zoom);
        self
    }

    /// Set the maximal zoom level to cluster the points on.
    pub fn max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = Some(max_zoom);
        self
    }

    /// Set the minimum points required to form a cluster.
    pub fn min_points(mut self, min_points: u8) -> Self {
        self.min_points = Some(min_points);
        self
    }

    /// Set the cluster radius in pixels.
    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the tile pixel extent.
    pub fn extent(mut self, extent: f64) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Set the KD-tree leaf node size.
    pub fn node_size(mut self, node_size: usize) -> Self {
        self.node_size = Some(node_size);
        self
    }

    /// Enable synthesizing integer ids for leaves that lack one.
    pub fn generate_id(mut self, generate_id: bool) -> Self {
        self.generate_id = Some(generate_id);
        self
    }

    /// Set the `map` hook (seeds an accumulator from a raw point's
    /// properties). Setting `map` without `reduce` (or vice versa) is a
    /// no-op for aggregation: both are required together.
    pub fn map(mut self, map: MapFn) -> Self {
        self.map = Some(map);
        self
    }

    /// Set the `reduce` hook (folds a contribution into an accumulator).
    pub fn reduce(mut self, reduce: ReduceFn) -> Self {
        self.reduce = Some(reduce);
        self
    }

    /// Build the configuration, applying defaults for unset fields.
    ///
    /// # Panics
    ///
    /// Panics if `max_zoom > 30`: the cluster id encoding has only 5 bits
    /// to spend on a cluster's origin zoom.
    pub fn build(self) -> ZoomClusterOptions {
        let max_zoom = self.max_zoom.unwrap_or(16);
        assert!(
            max_zoom <= 30,
            "max_zoom must be <= 30 (got {max_zoom}): the cluster id encoding reserves 5 bits for it"
        );

        let aggregator = match (self.map, self.reduce) {
            (Some(map), Some(reduce)) => Some(Aggregator::new(map, reduce)),
            _ => None,
        };

        ZoomClusterOptions {
            min_zoom: self.min_zoom.unwrap_or(0),
            max_zoom,
            min_points: self.min_points.unwrap_or(2),
            radius: self.radius.unwrap_or(40.0),
            extent: self.extent.unwrap_or(512.0),
            node_size: self.node_size.unwrap_or(64),
            generate_id: self.generate_id.unwrap_or(false),
            aggregator,
        }
    }
}

/// Builder for a list of point [`Feature`]s, for tests and examples that
/// don't want to hand-write GeoJSON.
#[derive(Clone, Debug, Default)]
pub struct FeatureBuilder {
    points: Vec<(Vec<f64>, Option<geojson::JsonObject>)>,
}

impl FeatureBuilder {
    /// Create a new, empty feature builder.
    pub fn new() -> Self {
        FeatureBuilder::default()
    }

    /// Add a point at `[lon, lat]` with no properties.
    pub fn add_point(mut self, point: Vec<f64>) -> Self {
        self.points.push((point, None));
        self
    }

    /// Add a point at `[lon, lat]` with the given properties.
    pub fn add_point_with_properties(mut self, point: Vec<f64>, properties: geojson::JsonObject) -> Self {
        self.points.push((point, Some(properties)));
        self
    }

    /// Add several points at once, all with no properties.
    pub fn add_points(mut self, points: Vec<Vec<f64>>) -> Self {
        for point in points {
            self.points.push((point, None));
        }
        self
    }

    /// Build the list of features.
    pub fn build(self) -> Vec<Feature> {
        self.points
            .into_iter()
            .enumerate()
            .map(|(i, (point, properties))| Feature {
                id: Some(Id::String(i.to_string())),
                geometry: Some(Geometry::new(Value::Point(point))),
                bbox: None,
                properties,
                foreign_members: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference() {
        let options = ZoomClusterBuilder::new().build();

        assert_eq!(options.min_zoom, 0);
        assert_eq!(options.max_zoom, 16);
        assert_eq!(options.min_points, 2);
        assert_eq!(options.radius, 40.0);
        assert_eq!(options.extent, 512.0);
        assert_eq!(options.node_size, 64);
        assert!(!options.generate_id);
        assert!(options.aggregator.is_none());
    }

    #[test]
    fn chained_setters_apply() {
        let options = ZoomClusterBuilder::new()
            .min_zoom(1)
            .max_zoom(10)
            .min_points(5)
            .radius(50.0)
            .extent(1024.0)
            .node_size(128)
            .generate_id(true)
            .build();

        assert_eq!(options.min_zoom, 1);
        assert_eq!(options.max_zoom, 10);
        assert_eq!(options.min_points, 5);
        assert_eq!(options.radius, 50.0);
        assert_eq!(options.extent, 1024.0);
        assert_eq!(options.node_size, 128);
        assert!(options.generate_id);
    }

    #[test]
    #[should_panic(expected = "max_zoom must be <= 30")]
    fn max_zoom_above_30_panics() {
        ZoomClusterBuilder::new().max_zoom(31).build();
    }

    #[test]
    fn feature_builder_creates_points() {
        let features = FeatureBuilder::new()
            .add_point(vec![0.0, 0.0])
            .add_points(vec![vec![1.0, 1.0], vec![2.0, 2.0]])
            .build();

        assert_eq!(features.len(), 3);
    }
}
