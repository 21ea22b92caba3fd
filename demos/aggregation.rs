use std::sync::Arc;

use geojson::JsonObject;
use serde_json::json;
use zoomcluster::{ZoomCluster, ZoomClusterError};

fn main() -> Result<(), ZoomClusterError> {
    // Points carrying a numeric "population" property. The aggregator sums
    // population across every point a cluster absorbs.
    let features = ZoomCluster::feature_builder()
        .add_point_with_properties(vec![-77.032, 38.913], json!({"population": 100}).as_object().unwrap().clone())
        .add_point_with_properties(vec![-77.033, 38.913], json!({"population": 250}).as_object().unwrap().clone())
        .add_point_with_properties(vec![-77.034, 38.913], json!({"population": 75}).as_object().unwrap().clone())
        .build();

    let options = ZoomCluster::builder()
        .radius(40.0)
        .extent(512.0)
        .min_points(2)
        .max_zoom(16)
        .map(Arc::new(|properties: &JsonObject| {
            let mut seed = JsonObject::new();
            let population = properties.get("population").and_then(|v| v.as_i64()).unwrap_or(0);
            seed.insert("population".to_string(), json!(population));
            seed
        }))
        .reduce(Arc::new(|accumulator: &mut JsonObject, contribution: &JsonObject| {
            let a = accumulator.get("population").and_then(|v| v.as_i64()).unwrap_or(0);
            let b = contribution.get("population").and_then(|v| v.as_i64()).unwrap_or(0);
            accumulator.insert("population".to_string(), json!(a + b));
        }))
        .build();

    let mut index = ZoomCluster::new(options);
    index.load(features)?;

    let clusters = index.get_clusters([-180.0, -90.0, 180.0, 90.0], 0)?;
    for cluster in &clusters {
        println!(
            "point_count={:?} population={:?}",
            cluster.property("point_count"),
            cluster.property("population"),
        );
    }

    Ok(())
}
