//! # Projection module
//!
//! Converts between (longitude, latitude) on the WGS84 sphere and unit-square
//! Web Mercator coordinates `(x, y) ∈ [0, 1]²`. Every other component works
//! exclusively in unit-square space; this is the only place degrees are
//! seen by the core.

use std::f64::consts::PI;

/// Project a (longitude, latitude) pair in degrees to unit-square Mercator
/// `(x, y)`, both in `[0, 1]`.
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    (project_x(lon), project_y(lat))
}

/// Project longitude in degrees to unit-square `x`.
pub fn project_x(lon: f64) -> f64 {
    lon / 360.0 + 0.5
}

/// Project latitude in degrees to unit-square `y`, clamped to `[0, 1]`.
///
/// `s = sin(lat · π / 180)` is not clamped away from ±1 directly; at the
/// poles `s` approaches ±1 and the log term diverges, but the final
/// `.clamp(0.0, 1.0)` brings the result back into range exactly as the
/// reference does.
pub fn project_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - (0.25 * ((1.0 + sin) / (1.0 - sin)).ln()) / PI;
    y.clamp(0.0, 1.0)
}

/// Unproject unit-square `x` back to longitude in degrees.
pub fn unproject_x(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Unproject unit-square `y` back to latitude in degrees.
pub fn unproject_y(y: f64) -> f64 {
    let y2 = ((180.0 - y * 360.0) * PI) / 180.0;
    (360.0 * y2.exp().atan()) / PI - 90.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_prime_meridian_is_center() {
        let (x, y) = project(0.0, 0.0);
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn antimeridian_maps_to_edges() {
        assert!((project_x(180.0) - 1.0).abs() < 1e-12);
        assert!((project_x(-180.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn latitude_extremes_clamp_into_unit_square() {
        assert_eq!(project_y(90.0), 0.0);
        assert_eq!(project_y(-90.0), 1.0);
    }

    #[test]
    fn round_trips_through_unprojection() {
        let (x, y) = project(12.34, -56.78);
        assert!((unproject_x(x) - 12.34).abs() < 1e-9);
        assert!((unproject_y(y) - (-56.78)).abs() < 1e-9);
    }
}
