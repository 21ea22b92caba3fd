#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # zoomcluster
//!
//! A hierarchical geospatial point clustering engine for Rust. Loads a
//! GeoJSON `FeatureCollection` of points once, pre-computes a cluster
//! hierarchy across a configurable zoom range, then answers bounding-box,
//! vector-tile, and drill-down queries against that hierarchy without
//! re-clustering.
//!
//! ## Documentation
//!
//! This crate was inspired by Mapbox's Supercluster, described in their
//! [blog post](https://blog.mapbox.com/clustering-millions-of-points-on-a-map-with-supercluster-272046ec5c97)
//! on clustering millions of points on a map.
//!
//! ## Usage
//!
//! To use the `zoomcluster` crate in your project, add it to your
//! `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! zoomcluster = "0.1"
//! ```
//!
//! Below is an example of building an index and fetching a tile from it.
//!
//! ```rust
//! use zoomcluster::{ZoomCluster, ZoomClusterError};
//!
//! fn main() -> Result<(), ZoomClusterError> {
//!     let options = ZoomCluster::builder()
//!         .radius(40.0)
//!         .extent(512.0)
//!         .min_points(2)
//!         .max_zoom(16)
//!         .build();
//!
//!     let mut index = ZoomCluster::new(options);
//!
//!     let features = ZoomCluster::feature_builder()
//!         .add_point(vec![0.0, 0.0])
//!         .build();
//!
//!     index.load(features)?;
//!
//!     let tile = index.get_tile(0, 0.0, 0.0)?;
//!     println!("tile has {} features", tile.features.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Benchmarks
//!
//! We use the `criterion` crate to benchmark loading a `FeatureCollection`,
//! retrieving a tile, and retrieving clusters for a bounding box. See the
//! `benches` directory in the repository for the full scenarios.
//!
//! ## Safety
//!
//! This crate uses `#![forbid(unsafe_code)]`: everything is implemented in
//! 100% safe Rust.

/// Property aggregator module: the caller-supplied `map`/`reduce` hooks
/// that let a cluster carry folded properties.
pub mod aggregate;

/// Builder module: chainable builders for configuration and input
/// features.
pub mod builder;

/// Clusterer module: one level of point/cluster agglomeration.
pub mod clusterer;

/// Error module: the crate's error type.
pub mod error;

/// Feature assembly module: turns store slots into output `Feature`s.
pub mod feature;

/// Identity codec module: packs/unpacks cluster ids.
pub mod identity;

/// Index module: the `ZoomCluster` struct and its `load` orchestration.
pub mod index;

/// KDBush module: the static 2-D KD-tree used for every per-zoom index.
pub mod kdbush;

/// PointStore module: per-zoom parallel arrays of point/cluster state.
pub mod point_store;

/// Projection module: WGS84 to unit-square Web Mercator conversion.
pub mod projection;

/// Query module: bounding-box, tile, and drill-down lookups.
pub mod query;

pub use aggregate::{Aggregator, MapFn, ReduceFn};
pub use builder::{FeatureBuilder, ZoomClusterBuilder, ZoomClusterOptions};
pub use error::ZoomClusterError;
pub use index::ZoomCluster;
pub use kdbush::{KDBush, DEFAULT_NODE_SIZE};
pub use point_store::{PointStore, Props};
pub use projection::{project, project_x, project_y, unproject_x, unproject_y};

/// A cluster's identity, disjoint from raw feature indices. See
/// [`identity`] for the encoding.
pub type ClusterId = u64;
