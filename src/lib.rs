pub mod config;
pub mod datafetch;
mod engine;
pub mod http;
pub mod store;

pub use engine::{DatasetStats, RefreshOutcome, SyncEngine, SyncError};
