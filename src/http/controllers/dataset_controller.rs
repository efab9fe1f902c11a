use crate::http::error::ApiError;
use crate::http::models::{DatasetStatsResponse, LastUpdateResponse};
use crate::SyncEngine;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Handler for GET /last_update
pub async fn last_update_handler(
    State(engine): State<Arc<SyncEngine>>,
) -> Result<Json<LastUpdateResponse>, ApiError> {
    let last_update = engine.last_update()?;

    Ok(Json(LastUpdateResponse {
        last_update: last_update.map(|d| d.format("%Y-%m-%d").to_string()),
    }))
}

/// Handler for GET /dataset/stats
pub async fn dataset_stats_handler(
    State(engine): State<Arc<SyncEngine>>,
) -> Result<Json<DatasetStatsResponse>, ApiError> {
    let stats = engine.stats()?;

    Ok(Json(DatasetStatsResponse {
        rows: stats.rows,
        columns: stats.columns,
        last_update: stats.last_update.map(|d| d.format("%Y-%m-%d").to_string()),
    }))
}
