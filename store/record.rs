use serde::{Deserialize, Serialize};

use crate::knn::GeoPoint;

/// One row of the fixed store dataset.
///
/// Records are loaded once and never mutated; identity is the record's
/// position in the dataset. The display fields are free-form strings taken
/// from the source file's feature properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub location: GeoPoint,
}

impl StoreRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: GeoPoint,
    ) -> Self {
        StoreRecord {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            location,
        }
    }
}
