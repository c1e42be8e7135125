//! GeoJSON rendering of store records and query results.
//!
//! The core hands the caller `(record, distance)` pairs; this module turns
//! them into the Feature / FeatureCollection payloads a map client consumes.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::knn::Unit;
use crate::store::record::StoreRecord;

/// Render one store as a GeoJSON Feature with its attributes as properties.
pub fn feature(record: &StoreRecord) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), record.id.clone().into());
    properties.insert("name".to_string(), record.name.clone().into());
    properties.insert("address".to_string(), record.address.clone().into());
    properties.insert("city".to_string(), record.city.clone().into());
    properties.insert("state".to_string(), record.state.clone().into());
    properties.insert(
        "postal_code".to_string(),
        record.postal_code.clone().into(),
    );

    Feature {
        bbox: None,
        // GeoJSON positions are [longitude, latitude]
        geometry: Some(Geometry::new(Value::Point(vec![
            record.location.longitude(),
            record.location.latitude(),
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// One store serialized as a Feature string.
pub fn feature_string(record: &StoreRecord) -> String {
    feature(record).to_string()
}

/// Assemble ranked query results into a FeatureCollection string, with the
/// distance (rounded to two decimals) and its unit injected into each
/// feature's properties, nearest first.
pub fn result_collection(results: &[(&StoreRecord, f64)], unit: Unit) -> String {
    let features = results
        .iter()
        .map(|(record, distance)| {
            let mut f = feature(record);
            if let Some(properties) = f.properties.as_mut() {
                properties.insert(
                    "distance".to_string(),
                    ((distance * 100.0).round() / 100.0).into(),
                );
                properties.insert("unit".to_string(), unit.to_string().into());
            }
            f
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
    .to_string()
}
