//! Great-circle distance on a sphere.
//!
//! The haversine formula computes the angular distance between two points
//! given their latitudes and longitudes. Keeping the result in radians until
//! the final unit conversion lets the index prune with a single metric while
//! callers choose miles or kilometers at the edge.
//!
//! # Reference
//!
//! https://en.wikipedia.org/wiki/Haversine_formula

use std::str::FromStr;

use derive_more::Display;

use crate::error::LocusError;
use crate::knn::point::GeoPoint;

/// Earth's mean radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle angular distance between two points, in radians.
///
/// Symmetric by construction and exactly zero for coordinate-identical
/// points. The formula works on angle differences, so the -180/180
/// longitude boundary and antipodal pairs need no special casing.
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();

    let delta_lat = lat2 - lat1;
    let delta_lon = lon2 - lon1;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Convert an angular distance in radians to a linear distance on a sphere
/// of the given radius. The radius constant picks the output unit.
pub fn to_linear(angular: f64, radius: f64) -> f64 {
    angular * radius
}

/// Output unit for caller-facing distances.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    #[display(fmt = "miles")]
    Miles,
    #[display(fmt = "km")]
    Kilometers,
}

impl Unit {
    /// Earth's mean radius expressed in this unit.
    pub fn earth_radius(self) -> f64 {
        match self {
            Unit::Miles => EARTH_RADIUS_MILES,
            Unit::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

impl FromStr for Unit {
    type Err = LocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "miles" | "mi" => Ok(Unit::Miles),
            "km" | "kilometers" => Ok(Unit::Kilometers),
            other => Err(LocusError::invalid_query(format!(
                "unknown unit '{}': expected miles or km",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_known_distance() {
        // Los Angeles to New York, roughly 2445 miles great-circle
        let la = point(34.0522, -118.2437);
        let ny = point(40.7128, -74.0060);

        let miles = to_linear(angular_distance(la, ny), EARTH_RADIUS_MILES);
        assert!(
            (miles - 2445.0).abs() < 15.0,
            "LA-NY should be about 2445 miles, got {}",
            miles
        );
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude at the equator is about 69.17 miles
        // (111.19 km); both conversions come from the same angular distance.
        let a = point(0.0, 0.0);
        let b = point(1.0, 0.0);
        let angular = angular_distance(a, b);

        let miles = to_linear(angular, Unit::Miles.earth_radius());
        let km = to_linear(angular, Unit::Kilometers.earth_radius());

        assert!((miles - 69.17).abs() / 69.17 < 0.001, "got {} miles", miles);
        assert!((km - 111.19).abs() / 111.19 < 0.001, "got {} km", km);
    }

    #[test]
    fn test_zero_distance_identity() {
        let p = point(34.0, -118.3);
        assert_eq!(angular_distance(p, p), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = point(39.9042, 116.4074);
        let b = point(31.2304, 121.4737);
        assert_eq!(angular_distance(a, b), angular_distance(b, a));
    }

    #[test]
    fn test_antipodal_is_finite() {
        // Antipodal points are half a circumference apart: π radians.
        let a = point(0.0, 0.0);
        let b = point(0.0, 180.0);
        let angular = angular_distance(a, b);
        assert!(angular.is_finite());
        assert!((angular - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_wraparound() {
        // Crossing the -180/180 boundary: these points are about 2 degrees
        // of longitude apart, not 358.
        let a = point(0.0, 179.0);
        let b = point(0.0, -179.0);
        let km = to_linear(angular_distance(a, b), EARTH_RADIUS_KM);
        assert!((km - 222.4).abs() < 1.0, "got {} km", km);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("miles".parse::<Unit>().unwrap(), Unit::Miles);
        assert_eq!("MI".parse::<Unit>().unwrap(), Unit::Miles);
        assert_eq!("km".parse::<Unit>().unwrap(), Unit::Kilometers);
        assert_eq!("Kilometers".parse::<Unit>().unwrap(), Unit::Kilometers);
        assert!("furlongs".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(Unit::Miles.to_string(), "miles");
        assert_eq!(Unit::Kilometers.to_string(), "km");
    }
}
