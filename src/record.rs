//! Typed unlock and reset log rows.

use crate::error::Result;
use crate::table::{RawTable, RESET_COLUMNS, UNLOCK_COLUMNS};
use chrono::{NaiveDate, NaiveDateTime};

pub const UNLOCK_TABLE: &str = "unlock";
pub const RESET_TABLE: &str = "reset";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Rows that may carry a timestamp and can be filtered by date
pub trait Timestamped {
    /// `None` when the cell was blank or in no known layout
    fn timestamp(&self) -> Option<NaiveDateTime>;
}

/// One account-unlock log entry
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub username: String,
    pub log: String,
}

/// One PIN-reset log entry
#[derive(Debug, Clone, PartialEq)]
pub struct ResetRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub username: String,
    pub log: String,
    pub module: String,
}

impl Timestamped for UnlockRecord {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

impl Timestamped for ResetRecord {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

impl UnlockRecord {
    pub fn new(timestamp: NaiveDateTime, username: &str, log: &str) -> Self {
        Self {
            timestamp: Some(timestamp),
            username: username.to_string(),
            log: log.to_string(),
        }
    }

    /// Parse every row of an unlock table, checking the schema first
    pub fn from_table(table: &RawTable) -> Result<Vec<Self>> {
        let table = table.normalized();
        let columns = table.require_columns(UNLOCK_TABLE, UNLOCK_COLUMNS)?;
        let (ts, user, log) = (columns[0], columns[1], columns[2]);

        let records = (0..table.len())
            .map(|row| Self {
                timestamp: parse_timestamp(table.cell(row, ts)),
                username: table.cell(row, user).trim().to_string(),
                log: table.cell(row, log).to_string(),
            })
            .collect();
        Ok(records)
    }
}

impl ResetRecord {
    pub fn new(timestamp: NaiveDateTime, username: &str, log: &str, module: &str) -> Self {
        Self {
            timestamp: Some(timestamp),
            username: username.to_string(),
            log: log.to_string(),
            module: module.to_string(),
        }
    }

    /// Parse every row of a reset table, checking the schema first
    pub fn from_table(table: &RawTable) -> Result<Vec<Self>> {
        let table = table.normalized();
        let columns = table.require_columns(RESET_TABLE, RESET_COLUMNS)?;
        let (ts, user, log, module) = (columns[0], columns[1], columns[2], columns[3]);

        let records = (0..table.len())
            .map(|row| Self {
                timestamp: parse_timestamp(table.cell(row, ts)),
                username: table.cell(row, user).trim().to_string(),
                log: table.cell(row, log).to_string(),
                module: table.cell(row, module).trim().to_string(),
            })
            .collect();
        Ok(records)
    }
}

/// Parse the timestamp layouts spreadsheet exports commonly produce
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
