//! # Feature assembly module
//!
//! Turns a `PointStore` slot into the GeoJSON `Feature` callers see: a
//! cluster gets synthetic `cluster`/`cluster_id`/`point_count`/
//! `point_count_abbreviated` properties (merged over whatever the
//! aggregator produced); a leaf echoes its original input feature.

use geojson::{feature::Id, Feature, Geometry, JsonObject, Value::Point};
use serde_json::json;

use crate::point_store::Props;
use crate::projection;
use crate::ClusterId;

/// Abbreviate a point count the way map UIs conventionally do: `"3"`,
/// `"1.2k"`, `"12k"`.
pub fn point_count_abbreviated(count: u32) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round() as u32)
    } else if count >= 1_000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

/// Build a cluster's properties: whatever the aggregator produced (if
/// anything), with the synthetic cluster fields layered on top.
pub fn cluster_properties(cluster_id: ClusterId, num_points: u32, props: &Props) -> JsonObject {
    let mut properties = match props {
        Props::Aggregate(aggregate) => aggregate.clone(),
        Props::Raw(raw) => raw.clone(),
        Props::None => JsonObject::new(),
    };

    properties.insert("cluster".to_string(), json!(true));
    properties.insert("cluster_id".to_string(), json!(cluster_id));
    properties.insert("point_count".to_string(), json!(num_points));
    properties.insert(
        "point_count_abbreviated".to_string(),
        json!(point_count_abbreviated(num_points)),
    );

    properties
}

/// Build the full-precision `Feature` for a cluster at unit-square
/// `(x, y)`.
pub fn cluster_feature(x: f64, y: f64, cluster_id: ClusterId, num_points: u32, props: &Props) -> Feature {
    let (lon, lat) = (projection::unproject_x(x), projection::unproject_y(y));

    Feature {
        id: Some(Id::String(cluster_id.to_string())),
        bbox: None,
        foreign_members: None,
        geometry: Some(Geometry::new(Point(vec![lon, lat]))),
        properties: Some(cluster_properties(cluster_id, num_points, props)),
    }
}

/// Project a unit-square point into a tile's local pixel space at `extent`.
/// Per-tile rounding differs for clusters and raw leaves: clusters round to
/// the nearest pixel (coarse synthetic positions, rounding is invisible),
/// leaves keep full precision (rounding a real point's position is a
/// visible distortion at high zoom).
pub fn project_to_tile(x: f64, y: f64, tile_x: f64, tile_y: f64, z2: f64, extent: f64, round: bool) -> (f64, f64) {
    let px = extent * (x * z2 - tile_x);
    let py = extent * (y * z2 - tile_y);

    if round {
        (px.round(), py.round())
    } else {
        (px, py)
    }
}
