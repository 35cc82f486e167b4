use crate::error::{ReportError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const TIMESTAMP: &str = "TIMESTAMP";
pub const USERNAME: &str = "USERNAME";
pub const LOG: &str = "LOG";
pub const MODULE: &str = "MODULE";

/// Columns every unlock table must carry
pub const UNLOCK_COLUMNS: &[&str] = &[TIMESTAMP, USERNAME, LOG];

/// Columns every reset table must carry
pub const RESET_COLUMNS: &[&str] = &[TIMESTAMP, USERNAME, LOG, MODULE];

/// Untyped table as read from a spreadsheet export: a header row and string cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<H, S>(headers: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; builder-style for fixtures and tests
    pub fn with_row<R, S>(mut self, row: R) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of the table with trimmed, upper-cased header names
    pub fn normalized(&self) -> Self {
        Self {
            headers: self
                .headers
                .iter()
                .map(|h| h.trim().to_uppercase())
                .collect(),
            rows: self.rows.clone(),
        }
    }

    /// Position of a column, compared case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Resolve the positions of `columns`, failing on the first one absent
    pub fn require_columns(&self, table: &str, columns: &[&str]) -> Result<Vec<usize>> {
        columns
            .iter()
            .map(|column| {
                self.column_index(column)
                    .ok_or_else(|| ReportError::schema(table, *column))
            })
            .collect()
    }

    /// Cell value, empty when the row is shorter than the header
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Read a headed CSV file into a raw table
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(path)?;
    load_table_from_reader(file)
}

/// Read headed CSV data from any reader; rows may be ragged
pub fn load_table_from_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut table = RawTable::new(headers.iter());

    for result in reader.records() {
        let record = result?;
        table.rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_headers() {
        let table = RawTable::new([" Timestamp", "username ", "Log"]).normalized();
        assert_eq!(table.headers, vec!["TIMESTAMP", "USERNAME", "LOG"]);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = RawTable::new(["Timestamp", "Username", "Log"]);
        assert_eq!(table.column_index("USERNAME"), Some(1));
        assert_eq!(table.require_columns("unlock", UNLOCK_COLUMNS).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_column_names_table_and_column() {
        let table = RawTable::new(["Timestamp", "Username", "Log"]);
        match table.require_columns("reset", RESET_COLUMNS) {
            Err(ReportError::Schema { table, column }) => {
                assert_eq!(table, "reset");
                assert_eq!(column, "MODULE");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_reads_ragged_csv() {
        let data = "Timestamp,Username,Log\n2024-05-02 10:00:00,WEBC_JOHN,\"Unlock 2291234567890: INVALID PASSWORD\"\n2024-05-02 11:00:00,WEBC_JOHN\n";
        let table = load_table_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 2), "Unlock 2291234567890: INVALID PASSWORD");
        assert_eq!(table.cell(1, 2), "");
    }
}
