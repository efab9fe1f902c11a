//! Remote-source access: fetching record batches newer than a watermark
//! and reshaping them onto the store's reference schema.

mod datafair;
mod error;
mod fetcher;
pub mod harmonize;
mod types;

pub use datafair::DataFairFetcher;
pub use error::DataFetchError;
pub use fetcher::RecordFetcher;
pub use types::FetchPage;
