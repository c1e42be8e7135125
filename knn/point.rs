use serde::{Deserialize, Serialize};

use crate::error::LocusError;

/// A point on the Earth's surface, in degrees.
///
/// Construction goes through [`GeoPoint::new`], which enforces
/// latitude ∈ [-90, 90] and longitude ∈ [-180, 180]; a `GeoPoint` that
/// exists is always valid. The type is `Copy` and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Create a validated point from degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocusError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(LocusError::invalid_query(format!(
                "latitude must be between -90 and 90, got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocusError::invalid_query(format!(
                "longitude must be between -180 and 180, got {}",
                longitude
            )));
        }

        Ok(GeoPoint {
            latitude,
            longitude,
        })
    }

    /// Internal constructor for points derived from already-valid points
    /// (e.g. a centroid of valid coordinates stays inside the valid ranges).
    pub(crate) fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        debug_assert!((-90.0..=90.0).contains(&latitude));
        debug_assert!((-180.0..=180.0).contains(&longitude));
        GeoPoint {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Both coordinates converted to radians, `(lat, lon)`.
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}
