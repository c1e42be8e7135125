use std::sync::Arc;

use crate::commands::{ArgumentParser, Command};
use crate::knn::{GeoPoint, KnnEngine, Unit};
use crate::protocol::Frame;
use crate::store::geojson;
use crate::Result;

/// FIND: k-nearest-stores query against the shared engine.
///
/// Replies with an array of `[feature, distance]` pairs, nearest first:
/// each store as a GeoJSON Feature string and its distance in the
/// requested (or configured default) unit, rounded to two decimals.
pub struct FindCommand {
    engine: Arc<KnnEngine>,
    default_unit: Unit,
}

impl FindCommand {
    pub fn new(engine: Arc<KnnEngine>, default_unit: Unit) -> Self {
        Self {
            engine,
            default_unit,
        }
    }
}

impl Command for FindCommand {
    fn name(&self) -> &'static str {
        "FIND"
    }

    fn execute(&self, args: &[Frame]) -> impl std::future::Future<Output = Result<String>> + Send {
        let engine = Arc::clone(&self.engine);
        let default_unit = self.default_unit;

        // 同步解析参数
        let parse_result = ArgumentParser::new(args, "FIND").parse_find_args();

        async move {
            let parsed = match parse_result {
                Ok(parsed) => parsed,
                Err(err_msg) => return Ok(Frame::error(err_msg).encode()),
            };

            // The parser already range-checked the coordinates; this keeps
            // the engine contract intact even if a caller bypasses it.
            let query = match GeoPoint::new(parsed.latitude, parsed.longitude) {
                Ok(point) => point,
                Err(e) => return Ok(Frame::error(format!("ERR {}", e)).encode()),
            };
            let unit = parsed.unit.unwrap_or(default_unit);

            match engine.find_nearest(query, parsed.k, unit) {
                Ok(results) => {
                    let items = results
                        .iter()
                        .map(|(record, distance)| {
                            Frame::array(vec![
                                Frame::bulk(geojson::feature_string(record)),
                                Frame::bulk(format!("{:.2}", distance)),
                            ])
                        })
                        .collect();
                    Ok(Frame::array(items).encode())
                }
                Err(e) => Ok(Frame::error(format!("ERR find failed: {}", e)).encode()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreDataset, StoreRecord};

    fn engine() -> Arc<KnnEngine> {
        let point = |lat, lon| GeoPoint::new(lat, lon).unwrap();
        let records = vec![
            StoreRecord::new("s0", "Vermont Ave", point(34.0, -118.3)),
            StoreRecord::new("s1", "Hollywood Blvd", point(34.1, -118.3)),
            StoreRecord::new("s2", "Manhattan", point(40.7, -74.0)),
            StoreRecord::new("s3", "Western Ave", point(34.0, -118.31)),
        ];
        Arc::new(KnnEngine::build(StoreDataset::from_records(records)).unwrap())
    }

    fn args(parts: &[&str]) -> Vec<Frame> {
        parts.iter().map(|p| Frame::bulk(*p)).collect()
    }

    #[tokio::test]
    async fn test_find_returns_nearest_stores() {
        let cmd = FindCommand::new(engine(), Unit::Miles);
        let response = cmd
            .execute(&args(&[
                "POINT",
                "34.098942",
                "-118.323040",
                "COUNT",
                "2",
            ]))
            .await
            .unwrap();

        // RESP array of two [feature, distance] pairs
        assert!(response.starts_with("*2\r\n"));
        assert!(response.contains("Hollywood Blvd"));
        assert!(response.contains("Western Ave"));
        // The New York store stays out of a k=2 Los Angeles query.
        assert!(!response.contains("Manhattan"));

        // Nearest first: Hollywood Blvd appears before Western Ave.
        let hollywood = response.find("Hollywood Blvd").unwrap();
        let western = response.find("Western Ave").unwrap();
        assert!(hollywood < western);
    }

    #[tokio::test]
    async fn test_find_unit_override() {
        let cmd = FindCommand::new(engine(), Unit::Miles);
        let query = ["POINT", "34.098942", "-118.323040", "COUNT", "1"];

        let miles = cmd.execute(&args(&query)).await.unwrap();
        let km = cmd
            .execute(&args(&[
                "POINT",
                "34.098942",
                "-118.323040",
                "COUNT",
                "1",
                "UNIT",
                "km",
            ]))
            .await
            .unwrap();

        // Same store either way, different numbers.
        assert!(miles.contains("Hollywood Blvd"));
        assert!(km.contains("Hollywood Blvd"));
        assert_ne!(miles, km);
    }

    #[tokio::test]
    async fn test_find_clamps_count() {
        let cmd = FindCommand::new(engine(), Unit::Miles);
        let response = cmd
            .execute(&args(&["POINT", "34.0", "-118.3", "COUNT", "100"]))
            .await
            .unwrap();
        assert!(response.starts_with("*4\r\n"));
    }

    #[tokio::test]
    async fn test_find_rejects_bad_count() {
        let cmd = FindCommand::new(engine(), Unit::Miles);
        let response = cmd
            .execute(&args(&["POINT", "34.0", "-118.3", "COUNT", "0"]))
            .await
            .unwrap();
        assert!(response.contains("ERR count must be greater than 0"));
    }

    #[tokio::test]
    async fn test_find_rejects_bad_coordinates() {
        let cmd = FindCommand::new(engine(), Unit::Miles);
        let response = cmd
            .execute(&args(&["POINT", "120.0", "-118.3", "COUNT", "2"]))
            .await
            .unwrap();
        assert!(response.contains("ERR invalid latitude"));
    }

    #[tokio::test]
    async fn test_find_rejects_missing_args() {
        let cmd = FindCommand::new(engine(), Unit::Miles);
        let response = cmd.execute(&args(&["POINT"])).await.unwrap();
        assert!(response.contains("wrong number of arguments"));
    }
}
