use serde_json::{Map, Value};

/// One batch of records fetched from a single source for one refresh.
///
/// Transient: tagged and reshaped into the dataset, then discarded.
#[derive(Debug, Default)]
pub struct FetchPage {
    /// Flat JSON records, in the order the source returned them.
    pub records: Vec<Map<String, Value>>,
    /// The page came back full, so more matching records may remain
    /// upstream beyond the page cap.
    pub at_cap: bool,
}

impl FetchPage {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
