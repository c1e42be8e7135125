use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

use crate::config::LocusConfig;
use crate::knn::{KnnEngine, Unit};
use crate::server::ServerConnection;
use crate::Result;

/// TCP front of the query engine.
///
/// The engine is built before the server starts; every connection shares
/// the same read-only index, so queries need no locking.
pub struct TcpServer {
    config: LocusConfig,
    engine: Arc<KnnEngine>,
    default_unit: Unit,
}

impl TcpServer {
    pub fn new(config: LocusConfig, engine: KnnEngine, default_unit: Unit) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
            default_unit,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("Locus server listening on {}", addr);
        info!("Serving {} stores", self.engine.len());
        info!("Ready to accept connections");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Accepted connection from {}", addr);

                    // 每个连接共享同一个只读引擎
                    let engine = Arc::clone(&self.engine);
                    let default_unit = self.default_unit;

                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, engine, default_unit).await {
                            error!("Error handling client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(
        stream: TcpStream,
        engine: Arc<KnnEngine>,
        default_unit: Unit,
    ) -> Result<()> {
        let mut connection = ServerConnection::new(stream, engine, default_unit);
        connection.handle().await
    }
}

impl Drop for TcpServer {
    fn drop(&mut self) {
        info!("TCP server shutting down");
    }
}
