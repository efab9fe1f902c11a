use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{DataFetchError, FetchPage, RecordFetcher};
use crate::config::{FetchConfig, SourceConfig};

/// Response envelope of a data-fair `lines` endpoint.
#[derive(Debug, Deserialize)]
struct LinesResponse {
    #[serde(default)]
    results: Vec<Map<String, Value>>,
}

/// Client for ADEME data-fair `lines` endpoints.
///
/// Issues one capped, sorted page per call, bounded by a postal-prefix
/// filter and an exclusive range filter on the timestamp column.
#[derive(Debug)]
pub struct DataFairFetcher {
    http_client: Client,
    timestamp_column: String,
    page_size: usize,
    region_prefix: String,
    region_field: String,
}

impl DataFairFetcher {
    pub fn new(fetch: &FetchConfig, timestamp_column: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            timestamp_column: timestamp_column.into(),
            page_size: fetch.page_size,
            region_prefix: fetch.region_prefix.clone(),
            region_field: fetch.region_field.clone(),
        }
    }

    /// Range filter with an exclusive lower bound, in the endpoint's
    /// query syntax: `col:{2024-01-10 TO *]`. A record dated exactly at
    /// the watermark is never re-fetched.
    fn range_query(&self, since: NaiveDate) -> String {
        format!(
            "{}:{{{} TO *]",
            self.timestamp_column,
            since.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl RecordFetcher for DataFairFetcher {
    async fn fetch_newer(
        &self,
        source: &SourceConfig,
        since: Option<NaiveDate>,
    ) -> Result<FetchPage, DataFetchError> {
        let mut query: Vec<(&str, String)> = vec![
            ("q", format!("{}*", self.region_prefix)),
            ("q_fields", self.region_field.clone()),
            ("size", self.page_size.to_string()),
            ("sort", self.timestamp_column.clone()),
        ];
        if let Some(since) = since {
            query.push(("qs", self.range_query(since)));
        }

        debug!(
            source = %source.label,
            url = %source.url,
            since = ?since,
            "Fetching records from source"
        );

        let response = self
            .http_client
            .get(&source.url)
            .query(&query)
            .send()
            .await
            .map_err(|e| DataFetchError::Request {
                source: source.label.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataFetchError::Status {
                source: source.label.clone(),
                status: status.as_u16(),
            });
        }

        let body: LinesResponse =
            response.json().await.map_err(|e| DataFetchError::Decode {
                source: source.label.clone(),
                message: e.to_string(),
            })?;

        let at_cap = body.results.len() >= self.page_size;
        debug!(
            source = %source.label,
            records = body.results.len(),
            at_cap,
            "Fetched page from source"
        );

        Ok(FetchPage {
            records: body.results,
            at_cap,
        })
    }
}
