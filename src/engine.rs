use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{AppConfig, SourceConfig};
use crate::datafetch::{harmonize, DataFairFetcher, DataFetchError, RecordFetcher};
use crate::store::{CsvStore, StoreError};

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Fetch(#[from] DataFetchError),
}

/// Result of one refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No source produced records; the store was not touched.
    NoUpdate,
    Updated {
        /// Count of newly merged records across all sources.
        new_rows: usize,
        /// Post-merge watermark.
        updated_until: Option<NaiveDate>,
        /// Sources whose page came back full; records beyond the page cap
        /// remain upstream until the next refresh.
        truncated_sources: Vec<String>,
    },
}

/// Shape summary of the persisted dataset.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    pub last_update: Option<NaiveDate>,
}

/// Brings the dataset store up to date against the configured remote
/// sources.
///
/// The store and the fetcher are injected at construction. Refreshes are
/// serialized by an internal mutex: the store file has no cross-process
/// locking, so at most one refresh may be in flight per store.
#[derive(Debug)]
pub struct SyncEngine {
    store: CsvStore,
    fetcher: Arc<dyn RecordFetcher>,
    sources: Vec<SourceConfig>,
    tag_column: String,
    refresh_lock: Mutex<()>,
}

impl SyncEngine {
    pub fn new(
        store: CsvStore,
        fetcher: Arc<dyn RecordFetcher>,
        sources: Vec<SourceConfig>,
        tag_column: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            sources,
            tag_column: tag_column.into(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let store = CsvStore::new(&config.store.path, &config.store.timestamp_column);
        let fetcher = Arc::new(DataFairFetcher::new(
            &config.fetch,
            &config.store.timestamp_column,
        ));
        Self::new(
            store,
            fetcher,
            config.sources.clone(),
            &config.store.tag_column,
        )
    }

    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    /// Fetch records newer than the current watermark from every source,
    /// reshape them to the reference schema, and merge them into the store.
    ///
    /// All-or-nothing: a failure against any source aborts the whole call
    /// before anything is persisted. No retries; the caller owns retry
    /// policy.
    pub async fn refresh(&self) -> Result<RefreshOutcome, SyncError> {
        let _guard = self.refresh_lock.lock().await;

        let mut dataset = self.store.load()?;
        let ts_column = dataset
            .column_index(self.store.timestamp_column())
            .ok_or_else(|| StoreError::MissingColumn(self.store.timestamp_column().to_string()))?;
        let watermark = dataset.max_date(ts_column);

        info!(
            watermark = ?watermark,
            sources = self.sources.len(),
            "Starting incremental refresh"
        );

        let mut new_rows: Vec<Vec<Option<String>>> = Vec::new();
        let mut truncated_sources: Vec<String> = Vec::new();

        for source in &self.sources {
            let page = self.fetcher.fetch_newer(source, watermark).await?;
            if page.is_empty() {
                info!(source = %source.label, "No new records");
                continue;
            }

            let dropped = harmonize::dropped_keys(&page.records, dataset.columns());
            if !dropped.is_empty() {
                warn!(
                    source = %source.label,
                    columns = ?dropped,
                    "Batch contained columns outside the reference schema"
                );
            }
            if page.at_cap {
                warn!(
                    source = %source.label,
                    records = page.len(),
                    "Page came back full; records beyond the cap remain upstream"
                );
                truncated_sources.push(source.label.clone());
            }

            info!(source = %source.label, records = page.len(), "Fetched new records");
            for record in &page.records {
                new_rows.push(harmonize::reshape(
                    record,
                    dataset.columns(),
                    &self.tag_column,
                    &source.tag,
                ));
            }
        }

        if new_rows.is_empty() {
            info!("No source produced new records; store untouched");
            return Ok(RefreshOutcome::NoUpdate);
        }

        let added = new_rows.len();
        dataset.extend_rows(new_rows);
        self.store.persist(&dataset)?;

        let updated_until = dataset.max_date(ts_column);
        info!(
            new_rows = added,
            updated_until = ?updated_until,
            total_rows = dataset.row_count(),
            "Merged and persisted dataset"
        );

        Ok(RefreshOutcome::Updated {
            new_rows: added,
            updated_until,
            truncated_sources,
        })
    }

    /// Current watermark of the persisted dataset.
    pub fn last_update(&self) -> Result<Option<NaiveDate>, SyncError> {
        Ok(self.store.current_watermark()?)
    }

    pub fn stats(&self) -> Result<DatasetStats, SyncError> {
        let dataset = self.store.load()?;
        let last_update = dataset
            .column_index(self.store.timestamp_column())
            .and_then(|column| dataset.max_date(column));
        Ok(DatasetStats {
            rows: dataset.row_count(),
            columns: dataset.columns().len(),
            last_update,
        })
    }
}
