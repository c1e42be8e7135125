//! Query orchestration over a built index.
//!
//! An engine pairs a dataset snapshot with the ball-tree built over its
//! coordinates. Construction is eager: an engine either holds a fully built
//! index or does not exist, so there is no half-built state to query and no
//! first-query latency spike. Rebuilding means constructing a new engine
//! over a new dataset.

use crate::error::LocusError;
use crate::knn::balltree::BallTree;
use crate::knn::haversine::{self, Unit};
use crate::knn::point::GeoPoint;
use crate::store::{StoreDataset, StoreRecord};

/// One ranked query result: a dataset index and the distance to the query
/// point in the unit the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// k-nearest-neighbor engine over an immutable store dataset.
///
/// Queries take `&self` and touch only query-local state, so one engine can
/// serve any number of concurrent queries behind an `Arc` without locking.
#[derive(Debug)]
pub struct KnnEngine {
    dataset: StoreDataset,
    coordinates: Vec<GeoPoint>,
    tree: BallTree,
}

impl KnnEngine {
    /// Build the index over `dataset` and return a ready engine.
    ///
    /// Fails with [`LocusError::EmptyIndex`] when the dataset holds no
    /// records; a dataset that was loaded successfully always has valid
    /// coordinates, the loader guarantees it.
    pub fn build(dataset: StoreDataset) -> Result<Self, LocusError> {
        Self::with_leaf_size(dataset, crate::knn::balltree::DEFAULT_LEAF_SIZE)
    }

    /// Build with an explicit ball-tree leaf size.
    pub fn with_leaf_size(dataset: StoreDataset, leaf_size: usize) -> Result<Self, LocusError> {
        // The coordinate column is extracted once; tree leaves refer into it
        // by index, never by copied record.
        let coordinates: Vec<GeoPoint> = dataset.records().iter().map(|r| r.location).collect();
        let tree = BallTree::with_leaf_size(&coordinates, leaf_size)?;

        Ok(KnnEngine {
            dataset,
            coordinates,
            tree,
        })
    }

    /// Find the `min(k, n)` stores nearest to `point`.
    ///
    /// Results are sorted ascending by distance, exact ties broken by
    /// ascending dataset index, with distances converted to `unit`. Asking
    /// for more results than the dataset holds clamps to the full set;
    /// `k < 1` is a contract violation and fails with
    /// [`LocusError::InvalidQuery`] without touching the index.
    pub fn query(
        &self,
        point: GeoPoint,
        k: usize,
        unit: Unit,
    ) -> Result<Vec<Neighbor>, LocusError> {
        if k == 0 {
            return Err(LocusError::invalid_query(
                "count must be greater than 0",
            ));
        }

        let radius = unit.earth_radius();
        let neighbors = self
            .tree
            .nearest(&self.coordinates, point, k)
            .into_iter()
            .map(|(index, angular)| Neighbor {
                index: index as usize,
                distance: haversine::to_linear(angular, radius),
            })
            .collect();

        Ok(neighbors)
    }

    /// Like [`query`](Self::query), with each neighbor joined back to its
    /// full store record.
    pub fn find_nearest(
        &self,
        point: GeoPoint,
        k: usize,
        unit: Unit,
    ) -> Result<Vec<(&StoreRecord, f64)>, LocusError> {
        let neighbors = self.query(point, k, unit)?;
        Ok(neighbors
            .into_iter()
            .map(|n| {
                // Indices come from the tree built over this dataset.
                let record = self
                    .dataset
                    .get(n.index)
                    .expect("neighbor index within dataset bounds");
                (record, n.distance)
            })
            .collect())
    }

    pub fn dataset(&self) -> &StoreDataset {
        &self.dataset
    }

    /// Number of indexed stores.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth of the underlying tree, for diagnostics.
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    /// The four-store fixture: three around Los Angeles, one in New York.
    fn la_engine() -> KnnEngine {
        let records = vec![
            StoreRecord::new("s0", "Vermont Ave", point(34.0, -118.3)),
            StoreRecord::new("s1", "Hollywood Blvd", point(34.1, -118.3)),
            StoreRecord::new("s2", "Manhattan", point(40.7, -74.0)),
            StoreRecord::new("s3", "Western Ave", point(34.0, -118.31)),
        ];
        KnnEngine::build(StoreDataset::from_records(records)).unwrap()
    }

    #[test]
    fn test_empty_dataset_fails() {
        let err = KnnEngine::build(StoreDataset::from_records(Vec::new())).unwrap_err();
        assert!(matches!(err, LocusError::EmptyIndex));
    }

    #[test]
    fn test_los_angeles_scenario() {
        let engine = la_engine();
        let query = point(34.098942, -118.323040);

        let results = engine.find_nearest(query, 2, Unit::Miles).unwrap();
        assert_eq!(results.len(), 2);

        // Hollywood Blvd is about 1.3 miles out, Western Ave about 7; the
        // New York store must not appear.
        assert_eq!(results[0].0.id, "s1");
        assert_eq!(results[1].0.id, "s3");
        assert!(results[0].1 < results[1].1);
        for (record, distance) in &results {
            assert_ne!(record.id, "s2");
            assert!(*distance > 0.0 && *distance < 10.0, "got {}", distance);
        }
    }

    #[test]
    fn test_k_zero_rejected_engine_still_usable() {
        let engine = la_engine();
        let query = point(34.0, -118.3);

        let err = engine.query(query, 0, Unit::Miles).unwrap_err();
        assert!(matches!(err, LocusError::InvalidQuery(_)));

        // The failed query left no trace; the same engine keeps answering.
        let results = engine.query(query, 1, Unit::Miles).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 0);
    }

    #[test]
    fn test_k_clamps_to_dataset_size() {
        let engine = la_engine();
        let results = engine
            .query(point(34.0, -118.3), 10_000, Unit::Miles)
            .unwrap();
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_zero_distance_in_any_unit() {
        let engine = la_engine();
        let query = point(34.1, -118.3); // exactly the Hollywood Blvd store

        for unit in [Unit::Miles, Unit::Kilometers] {
            let results = engine.query(query, 1, unit).unwrap();
            assert_eq!(results[0].index, 1);
            assert_eq!(results[0].distance, 0.0);
        }
    }

    #[test]
    fn test_unit_conversion_ratio() {
        let engine = la_engine();
        let query = point(34.05, -118.32);

        let miles = engine.query(query, 4, Unit::Miles).unwrap();
        let km = engine.query(query, 4, Unit::Kilometers).unwrap();

        for (m, k) in miles.iter().zip(km.iter()) {
            assert_eq!(m.index, k.index);
            // Same angular distance scaled by the two radii.
            let ratio = k.distance / m.distance;
            assert!((ratio - 6371.0 / 3958.8).abs() < 1e-9, "ratio {}", ratio);
        }
    }

    #[test]
    fn test_repeated_queries_bit_identical() {
        let engine = la_engine();
        let query = point(34.098942, -118.323040);

        let first = engine.query(query, 3, Unit::Miles).unwrap();
        let second = engine.query(query, 3, Unit::Miles).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distances_never_negative_or_nan() {
        let engine = la_engine();
        let results = engine
            .query(point(-33.8688, 151.2093), 4, Unit::Kilometers)
            .unwrap();
        for n in results {
            assert!(n.distance.is_finite());
            assert!(n.distance >= 0.0);
        }
    }
}
