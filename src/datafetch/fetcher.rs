use async_trait::async_trait;
use chrono::NaiveDate;

use super::{DataFetchError, FetchPage};
use crate::config::SourceConfig;

/// Trait for fetching records from a remote source.
///
/// The lower bound is exclusive: implementations must only return records
/// whose timestamp is strictly greater than `since`. `None` means no bound
/// (fetch from the beginning of the dataset).
#[async_trait]
pub trait RecordFetcher: Send + Sync + std::fmt::Debug {
    async fn fetch_newer(
        &self,
        source: &SourceConfig,
        since: Option<NaiveDate>,
    ) -> Result<FetchPage, DataFetchError>;
}
