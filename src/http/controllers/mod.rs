pub mod dataset_controller;
pub mod health_controller;
pub mod refresh_controller;

pub use dataset_controller::{dataset_stats_handler, last_update_handler};
pub use health_controller::health_handler;
pub use refresh_controller::refresh_handler;
