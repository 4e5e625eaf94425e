//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometers (haversine formula).
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinates::new(31.5, 34.47);
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(31.5, 34.47);
        let b = Coordinates::new(32.0, 35.0);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Paris to London is roughly 344 km.
        let paris = Coordinates::new(48.8566, 2.3522);
        let london = Coordinates::new(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!((d - 344.0).abs() < 5.0, "got {d} km");
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is about 111 km everywhere.
        let a = Coordinates::new(10.0, 20.0);
        let b = Coordinates::new(11.0, 20.0);
        let d = a.distance_km(&b);
        assert!((d - 111.2).abs() < 1.0, "got {d} km");
    }
}
