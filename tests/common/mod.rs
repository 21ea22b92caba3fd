use geojson::{feature::Id, Feature, Geometry, JsonObject, Value::Point};

/// A point feature at `(lon, lat)` with no properties.
pub fn point(lon: f64, lat: f64) -> Feature {
    Feature {
        id: None,
        bbox: None,
        foreign_members: None,
        geometry: Some(Geometry::new(Point(vec![lon, lat]))),
        properties: Some(JsonObject::new()),
    }
}

/// A point feature at `(lon, lat)` carrying a `name` property, the way the
/// reference `places.json` fixture's entries are shaped.
pub fn named_point(lon: f64, lat: f64, name: &str) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), serde_json::json!(name));

    Feature {
        id: None,
        bbox: None,
        foreign_members: None,
        geometry: Some(Geometry::new(Point(vec![lon, lat]))),
        properties: Some(properties),
    }
}

/// A point feature at `(lon, lat)` with `properties: null`.
pub fn point_with_null_properties(lon: f64, lat: f64) -> Feature {
    Feature {
        id: None,
        bbox: None,
        foreign_members: None,
        geometry: Some(Geometry::new(Point(vec![lon, lat]))),
        properties: None,
    }
}

/// A point feature at `(lon, lat)` carrying an explicit integer `id`.
pub fn point_with_id(lon: f64, lat: f64, id: i64) -> Feature {
    Feature {
        id: Some(Id::Number(id.into())),
        bbox: None,
        foreign_members: None,
        geometry: Some(Geometry::new(Point(vec![lon, lat]))),
        properties: Some(JsonObject::new()),
    }
}

/// A tight cluster of `count` points around `(lon, lat)`, each offset by a
/// tiny, strictly increasing fraction of a degree so no two are perfectly
/// coincident (useful for building a deterministic multi-point cluster).
pub fn tight_cluster(lon: f64, lat: f64, count: usize) -> Vec<Feature> {
    (0..count)
        .map(|i| point(lon + i as f64 * 0.0001, lat + i as f64 * 0.0001))
        .collect()
}
