use zoomcluster::{ZoomCluster, ZoomClusterError, ZoomClusterOptions};

fn main() -> Result<(), ZoomClusterError> {
    // Create a list of features
    let features = ZoomCluster::feature_builder()
        .add_point(vec![-77.032, 38.913])
        .add_point(vec![-77.033, 38.913])
        .add_point(vec![-77.034, 38.913])
        .build();

    // Build the configuration from a JSON string
    let options: ZoomClusterOptions = serde_json::from_str(
        r#"{
            "radius": 40.0,
            "extent": 512.0,
            "min_points": 1,
            "node_size": 64,
            "min_zoom": 2,
            "max_zoom": 16,
            "generate_id": false
        }"#,
    )
    .unwrap();

    // Create a new, empty index with the given configuration
    let mut index = ZoomCluster::new(options);

    // Load the features into the index
    index.load(features)?;

    // Get a tile from the index
    let tile = index.get_tile(0, 0.0, 0.0)?;

    let json_string = serde_json::to_string(&tile).unwrap();
    println!("tile: {}", json_string);

    Ok(())
}
