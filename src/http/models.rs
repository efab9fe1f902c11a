use serde::Serialize;

/// Response body for POST /refresh_data
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshResponse {
    /// No source had records newer than the watermark.
    NoUpdate { message: String },
    /// New records were merged and persisted.
    Ok {
        new_rows: usize,
        updated_until: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        truncated_sources: Vec<String>,
    },
}

/// Response body for GET /last_update
#[derive(Debug, Serialize)]
pub struct LastUpdateResponse {
    pub last_update: Option<String>,
}

/// Response body for GET /dataset/stats
#[derive(Debug, Serialize)]
pub struct DatasetStatsResponse {
    pub rows: usize,
    pub columns: usize,
    pub last_update: Option<String>,
}
