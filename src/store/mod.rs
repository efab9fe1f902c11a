//! Flat-file dataset store with watermark tracking.

mod csv_store;
mod dataset;
mod error;

pub use csv_store::CsvStore;
pub use dataset::{parse_date, Dataset};
pub use error::StoreError;
