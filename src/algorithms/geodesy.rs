//! Spherical-earth geodesy for comparing fixes
//!
//! Positions are mapped to unit normal vectors ("n-vectors") so that the
//! great-circle angle can be taken with `atan2(|a x b|, a . b)`, which stays
//! well conditioned for both very short and near-antipodal separations.

use crate::core::{Position, EARTH_MEAN_RADIUS_M};
use nalgebra::Vector3;

/// Unit normal vector of a geodetic position on the sphere
pub fn n_vector(position: &Position) -> Vector3<f64> {
    let lat = position.lat.to_radians();
    let lon = position.lon.to_radians();
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Central angle between two positions (radians)
pub fn central_angle(a: &Position, b: &Position) -> f64 {
    let na = n_vector(a);
    let nb = n_vector(b);
    na.cross(&nb).norm().atan2(na.dot(&nb))
}

/// Great-circle distance between two positions (meters)
pub fn great_circle_distance(a: &Position, b: &Position) -> f64 {
    EARTH_MEAN_RADIUS_M * central_angle(a, b)
}

/// Position reached from `origin` after `distance_m` along the initial bearing `bearing_deg`
pub fn destination(origin: &Position, bearing_deg: f64, distance_m: f64) -> Position {
    let delta = distance_m / EARTH_MEAN_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    // Normalise longitude to [-180, 180)
    let lon2 = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Position::new(lat2.to_degrees(), lon2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Position::new(48.8566, 2.3522);
        assert!(great_circle_distance(&p, &p).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 1.0);
        let expected = EARTH_MEAN_RADIUS_M * std::f64::consts::PI / 180.0;
        assert!((great_circle_distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let berlin = Position::new(52.52, 13.405);
        let munich = Position::new(48.1351, 11.582);
        let d1 = great_circle_distance(&berlin, &munich);
        let d2 = great_circle_distance(&munich, &berlin);
        assert!((d1 - d2).abs() < 1e-6);
        // Roughly 504 km apart
        assert!(d1 > 500_000.0 && d1 < 510_000.0);
    }

    #[test]
    fn test_destination_round_trip() {
        let origin = Position::new(37.7749, -122.4194);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0] {
            let target = destination(&origin, bearing, 2000.0);
            let d = great_circle_distance(&origin, &target);
            assert!((d - 2000.0).abs() < 1e-3, "bearing {} gave {}", bearing, d);
        }
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let origin = Position::new(0.0, 179.99);
        let target = destination(&origin, 90.0, 5000.0);
        assert!(target.lon < -179.0);
    }
}
