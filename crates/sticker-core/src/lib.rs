pub mod config;
pub mod geometry;
pub mod id;
pub mod model;
pub mod registry;
pub mod store;

pub use config::{BoardConfig, MatchPolicy};
pub use geometry::{clamp_origin, drop_origin, within_tolerance};
pub use id::StickerId;
pub use model::*;
pub use registry::PlacementRegistry;
pub use store::{JsonFileStore, MemoryStore, StateAdapter};
