//! # Error module
//!
//! Contains the error type for the zoomcluster crate.

use thiserror::Error;

/// zoomcluster error.
///
/// Every fallible operation in this crate returns one of these three kinds;
/// there is no silent fallback on malformed input or out-of-range lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoomClusterError {
    /// The zoom level decoded from a cluster id (or passed directly to a
    /// zoom-addressed lookup) does not correspond to a zoom level held in
    /// the index.
    #[error("zoom level {0} is not part of this index")]
    InvalidZoom(u8),

    /// The cluster id is well-formed (its zoom exists) but does not
    /// reference a cluster, or a lookup derived from it produced no results.
    #[error("no cluster found for id {0}")]
    NotFound(u64),

    /// A feature could not be loaded: missing/non-Point geometry, or
    /// non-finite coordinates.
    #[error("invalid input feature: {0}")]
    InvalidInput(String),
}
