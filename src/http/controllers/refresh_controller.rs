use crate::http::error::ApiError;
use crate::http::models::RefreshResponse;
use crate::{RefreshOutcome, SyncEngine};
use axum::{extract::State, Json};
use std::sync::Arc;

/// Handler for POST /refresh_data
#[tracing::instrument(name = "handler_refresh_data", skip(engine))]
pub async fn refresh_handler(
    State(engine): State<Arc<SyncEngine>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let response = match engine.refresh().await? {
        RefreshOutcome::NoUpdate => RefreshResponse::NoUpdate {
            message: "No new records found".to_string(),
        },
        RefreshOutcome::Updated {
            new_rows,
            updated_until,
            truncated_sources,
        } => RefreshResponse::Ok {
            new_rows,
            updated_until: updated_until.map(|d| d.format("%Y-%m-%d").to_string()),
            truncated_sources,
        },
    };

    Ok(Json(response))
}
