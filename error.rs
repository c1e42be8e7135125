use thiserror::Error;

/// Errors produced by the k-NN core and dataset loading.
#[derive(Debug, Error)]
pub enum LocusError {
    /// Index construction was attempted over zero usable points, or a query
    /// reached an engine that holds no index.
    #[error("empty index: no points with usable coordinates")]
    EmptyIndex,

    /// A query argument violated the engine contract (k < 1, coordinates
    /// outside valid ranges, unknown distance unit). The engine remains
    /// usable after rejecting the query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The source dataset could not be read or contained no usable rows.
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),
}

impl LocusError {
    /// Convenience constructor for query-contract violations.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        LocusError::InvalidQuery(msg.into())
    }
}
