pub mod dataset;
pub mod geojson;
pub mod record;

// 重新导出主要类型
pub use dataset::StoreDataset;
pub use record::StoreRecord;
