use std::sync::Arc;

use crate::commands::Command;
use crate::knn::{KnnEngine, Unit};
use crate::protocol::Frame;
use crate::Result;

/// INFO: dataset and index statistics as a key:value bulk string.
pub struct InfoCommand {
    engine: Arc<KnnEngine>,
    default_unit: Unit,
}

impl InfoCommand {
    pub fn new(engine: Arc<KnnEngine>, default_unit: Unit) -> Self {
        Self {
            engine,
            default_unit,
        }
    }
}

impl Command for InfoCommand {
    fn name(&self) -> &'static str {
        "INFO"
    }

    fn execute(&self, _args: &[Frame]) -> impl std::future::Future<Output = Result<String>> + Send {
        let body = format!(
            "version:{}\nstores:{}\ntree_depth:{}\ndefault_unit:{}",
            env!("CARGO_PKG_VERSION"),
            self.engine.len(),
            self.engine.depth(),
            self.default_unit,
        );

        async move { Ok(Frame::bulk(body).encode()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knn::GeoPoint;
    use crate::store::{StoreDataset, StoreRecord};

    #[tokio::test]
    async fn test_info_reports_stats() {
        let records = vec![
            StoreRecord::new("a", "One", GeoPoint::new(34.0, -118.3).unwrap()),
            StoreRecord::new("b", "Two", GeoPoint::new(34.1, -118.2).unwrap()),
        ];
        let engine = Arc::new(KnnEngine::build(StoreDataset::from_records(records)).unwrap());

        let response = InfoCommand::new(engine, Unit::Kilometers)
            .execute(&[])
            .await
            .unwrap();

        assert!(response.contains("stores:2"));
        assert!(response.contains("tree_depth:1"));
        assert!(response.contains("default_unit:km"));
    }
}
