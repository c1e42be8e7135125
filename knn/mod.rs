pub mod balltree;
pub mod engine;
pub mod haversine;
pub mod point;

// 重新导出主要类型
pub use balltree::BallTree;
pub use engine::{KnnEngine, Neighbor};
pub use haversine::Unit;
pub use point::GeoPoint;
