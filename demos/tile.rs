use zoomcluster::{ZoomCluster, ZoomClusterError};

fn main() -> Result<(), ZoomClusterError> {
    // Create a FeatureCollection using the FeatureBuilder
    let features = ZoomCluster::feature_builder()
        .add_point(vec![-77.032, 38.913])
        .add_point(vec![-77.033, 38.913])
        .add_point(vec![-77.034, 38.913])
        .build();

    // Set the configuration settings
    let options = ZoomCluster::builder()
        .radius(40.0)
        .extent(512.0)
        .min_points(2)
        .max_zoom(16)
        .build();

    // Create a new, empty index with the given configuration
    let mut index = ZoomCluster::new(options);

    // Load the features into the index
    index.load(features)?;

    // Get a tile from the index
    let tile = index.get_tile(0, 0.0, 0.0)?;

    println!("Tile: {:?}", tile);

    Ok(())
}
