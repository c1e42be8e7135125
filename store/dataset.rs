//! Loading and holding the fixed store dataset.
//!
//! The dataset is a GeoJSON FeatureCollection of Point features whose
//! properties carry the store attributes. It is read once at startup into
//! an immutable, position-indexed sequence; the spatial index is built over
//! that snapshot and stays valid for its whole lifetime.

use std::fs;
use std::path::Path;

use geo::Geometry;
use geojson::GeoJson;
use serde_json::Value;
use tracing::warn;

use crate::error::LocusError;
use crate::knn::GeoPoint;
use crate::store::record::StoreRecord;

/// An ordered, immutable collection of store records, indexed 0..n-1.
#[derive(Debug, Clone)]
pub struct StoreDataset {
    records: Vec<StoreRecord>,
}

impl StoreDataset {
    /// Wrap an already-validated record list.
    pub fn from_records(records: Vec<StoreRecord>) -> Self {
        StoreDataset { records }
    }

    /// Read a GeoJSON FeatureCollection file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LocusError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            LocusError::Dataset(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_geojson(&contents)
    }

    /// Parse a GeoJSON FeatureCollection string into a dataset.
    ///
    /// Features without a Point geometry or with coordinates outside the
    /// valid latitude/longitude ranges are skipped with a warning; they
    /// must never reach index construction. A collection that yields zero
    /// usable records is an error, not an empty dataset.
    pub fn from_geojson(contents: &str) -> Result<Self, LocusError> {
        let geojson = contents.parse::<GeoJson>()?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => {
                return Err(LocusError::Dataset(
                    "expected a GeoJSON FeatureCollection".to_string(),
                ))
            }
        };

        let mut records = Vec::with_capacity(collection.features.len());
        for (position, feature) in collection.features.into_iter().enumerate() {
            let location = match feature_location(&feature) {
                Some(location) => location,
                None => {
                    warn!(
                        "skipping feature {}: no usable Point coordinates",
                        position
                    );
                    continue;
                }
            };

            let mut id = prop_string(&feature, "id");
            if id.is_empty() {
                id = position.to_string();
            }

            records.push(StoreRecord {
                id,
                name: prop_string(&feature, "name"),
                address: prop_string(&feature, "address"),
                city: prop_string(&feature, "city"),
                state: prop_string(&feature, "state"),
                postal_code: prop_string(&feature, "postal_code"),
                location,
            });
        }

        if records.is_empty() {
            return Err(LocusError::Dataset(
                "no features with usable coordinates".to_string(),
            ));
        }

        Ok(StoreDataset { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StoreRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[StoreRecord] {
        &self.records
    }
}

/// Extract a validated location from a feature, if it has one.
fn feature_location(feature: &geojson::Feature) -> Option<GeoPoint> {
    let geometry = feature.geometry.clone()?;
    let geometry: Geometry<f64> = geometry.try_into().ok()?;

    match geometry {
        // GeoJSON stores positions as [longitude, latitude]
        Geometry::Point(p) => GeoPoint::new(p.y(), p.x()).ok(),
        _ => None,
    }
}

/// Read a string-ish property, tolerating numeric values (store ids and
/// postal codes often arrive as numbers).
fn prop_string(feature: &geojson::Feature, key: &str) -> String {
    match feature.properties.as_ref().and_then(|p| p.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "id": 1001,
                    "name": "Hollywood Liquor",
                    "address": "1500 N Western Ave",
                    "city": "Los Angeles",
                    "state": "CA",
                    "postal_code": "90027"
                },
                "geometry": {"type": "Point", "coordinates": [-118.3, 34.0]}
            },
            {
                "type": "Feature",
                "properties": {"id": "1002", "name": "Broken Row"},
                "geometry": {"type": "Point", "coordinates": [-118.3, 95.0]}
            },
            {
                "type": "Feature",
                "properties": {"id": "1003", "name": "Route Not A Store"},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-118.3, 34.0], [-118.2, 34.1]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "No Id Corner"},
                "geometry": {"type": "Point", "coordinates": [-74.0, 40.7]}
            }
        ]
    }"#;

    #[test]
    fn test_load_filters_unusable_features() {
        let dataset = StoreDataset::from_geojson(FIXTURE).unwrap();

        // The out-of-range latitude and the LineString are both dropped.
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(0).unwrap().name, "Hollywood Liquor");
        assert_eq!(dataset.get(1).unwrap().name, "No Id Corner");
    }

    #[test]
    fn test_properties_mapping() {
        let dataset = StoreDataset::from_geojson(FIXTURE).unwrap();
        let record = dataset.get(0).unwrap();

        // Numeric id arrives as a string
        assert_eq!(record.id, "1001");
        assert_eq!(record.address, "1500 N Western Ave");
        assert_eq!(record.city, "Los Angeles");
        assert_eq!(record.state, "CA");
        assert_eq!(record.postal_code, "90027");
        assert_eq!(record.location.latitude(), 34.0);
        assert_eq!(record.location.longitude(), -118.3);
    }

    #[test]
    fn test_missing_id_falls_back_to_position() {
        let dataset = StoreDataset::from_geojson(FIXTURE).unwrap();
        // "No Id Corner" is feature 3 in the source file.
        assert_eq!(dataset.get(1).unwrap().id, "3");
    }

    #[test]
    fn test_empty_collection_is_an_error() {
        let err = StoreDataset::from_geojson(r#"{"type":"FeatureCollection","features":[]}"#)
            .unwrap_err();
        assert!(matches!(err, LocusError::Dataset(_)));
    }

    #[test]
    fn test_all_features_unusable_is_an_error() {
        let contents = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"id": "x"},
                    "geometry": {"type": "Point", "coordinates": [200.0, 34.0]}
                }
            ]
        }"#;
        assert!(StoreDataset::from_geojson(contents).is_err());
    }

    #[test]
    fn test_non_collection_rejected() {
        let err = StoreDataset::from_geojson(
            r#"{"type":"Point","coordinates":[-118.3,34.0]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }
}
