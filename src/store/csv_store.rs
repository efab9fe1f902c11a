use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::{Dataset, StoreError};

/// The canonical dataset file plus its designated timestamp column.
///
/// The store is a full-file rewrite target: `persist` always receives the
/// complete merged dataset, never an append.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    timestamp_column: String,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>, timestamp_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            timestamp_column: timestamp_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    /// Read the whole dataset. Empty CSV fields become `None`.
    pub fn load(&self) -> Result<Dataset, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut dataset = Dataset::new(columns);
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            dataset.push_row(row);
        }

        Ok(dataset)
    }

    /// Maximum non-null date in the timestamp column, or `None` when no
    /// cell parses. Unparsable cells are skipped, never fatal.
    pub fn current_watermark(&self) -> Result<Option<NaiveDate>, StoreError> {
        let dataset = self.load()?;
        let column = dataset
            .column_index(&self.timestamp_column)
            .ok_or_else(|| StoreError::MissingColumn(self.timestamp_column.clone()))?;
        Ok(dataset.max_date(column))
    }

    /// Overwrite the store file with the given dataset.
    ///
    /// Writes to a temp file in the same directory and renames over the
    /// target, so a crash mid-write cannot truncate the store.
    pub fn persist(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
            None => tempfile::NamedTempFile::new_in(".")?,
        };

        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer.write_record(dataset.columns())?;
            for row in dataset.rows() {
                writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
            }
            writer.flush()?;
        }

        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}
