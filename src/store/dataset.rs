use chrono::NaiveDate;

/// In-memory image of the persisted dataset.
///
/// `columns` is the reference schema: every row carries exactly one cell per
/// column, in column order. A missing value is `None` and round-trips as an
/// empty CSV field.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row already shaped to the reference schema.
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Vec<Option<String>>>) {
        for row in rows {
            self.push_row(row);
        }
    }

    /// Maximum parsable date in the given column. Cells that do not parse
    /// are skipped.
    pub fn max_date(&self, column: usize) -> Option<NaiveDate> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column)?.as_deref())
            .filter_map(parse_date)
            .max()
    }
}

/// Parse the date prefix of a cell, tolerating a trailing time component
/// ("2024-01-10" and "2024-01-10T08:30:00" both yield 2024-01-10).
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    let head = trimmed.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_and_datetimes() {
        assert_eq!(
            parse_date("2024-01-10"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        assert_eq!(
            parse_date(" 2024-01-10T08:30:00 "),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("10/01/2024"), None);
    }

    #[test]
    fn max_date_skips_unparsable_cells() {
        let mut dataset = Dataset::new(vec!["id".to_string(), "date".to_string()]);
        dataset.push_row(vec![Some("1".to_string()), Some("2024-01-05".to_string())]);
        dataset.push_row(vec![Some("2".to_string()), Some("garbage".to_string())]);
        dataset.push_row(vec![Some("3".to_string()), None]);
        dataset.push_row(vec![Some("4".to_string()), Some("2024-01-10".to_string())]);

        assert_eq!(dataset.max_date(1), NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[test]
    fn max_date_is_none_when_nothing_parses() {
        let mut dataset = Dataset::new(vec!["date".to_string()]);
        dataset.push_row(vec![None]);
        dataset.push_row(vec![Some("???".to_string())]);

        assert_eq!(dataset.max_date(0), None);
    }
}
