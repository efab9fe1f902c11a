use crate::http::controllers::{
    dataset_stats_handler, health_handler, last_update_handler, refresh_handler,
};
use crate::SyncEngine;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub struct AppServer {
    pub router: Router,
    pub engine: Arc<SyncEngine>,
}

pub const PATH_REFRESH: &str = "/refresh_data";
pub const PATH_LAST_UPDATE: &str = "/last_update";
pub const PATH_DATASET_STATS: &str = "/dataset/stats";
pub const PATH_HEALTH: &str = "/health";

impl AppServer {
    pub fn new(engine: SyncEngine) -> Self {
        let engine = Arc::new(engine);
        AppServer {
            router: Router::new()
                .route(PATH_REFRESH, post(refresh_handler))
                .route(PATH_LAST_UPDATE, get(last_update_handler))
                .route(PATH_DATASET_STATS, get(dataset_stats_handler))
                .route(PATH_HEALTH, get(health_handler))
                .with_state(engine.clone()),
            engine,
        }
    }
}
