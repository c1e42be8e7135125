pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod knn;
pub mod protocol;
pub mod server;
pub mod store;

use std::error::Error;

// 重新导出主要的公共接口
pub use error::LocusError;
pub use knn::{BallTree, GeoPoint, KnnEngine, Neighbor, Unit};
pub use store::{StoreDataset, StoreRecord};

// 重新导出常用类型，便于二进制文件使用
pub use client::{CliArgs, ClientConnection, OutputFormatter};
pub use config::LocusConfig;
pub use server::TcpServer;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
