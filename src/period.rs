use crate::error::{ReportError, Result};
use crate::record::Timestamped;
use chrono::NaiveDate;
use std::fmt;

/// Inclusive reporting window, compared on calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window from the earliest to the latest timestamp of both tables.
    /// Undated rows are ignored.
    pub fn spanning<U: Timestamped, R: Timestamped>(unlock: &[U], reset: &[R]) -> Option<Self> {
        let dates = unlock
            .iter()
            .filter_map(|r| r.timestamp())
            .chain(reset.iter().filter_map(|r| r.timestamp()))
            .map(|timestamp| timestamp.date());

        dates.fold(None, |range: Option<Self>, date| {
            Some(match range {
                Some(range) => Self {
                    start: range.start.min(date),
                    end: range.end.max(date),
                },
                None => Self {
                    start: date,
                    end: date,
                },
            })
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Rows whose timestamp falls inside the window; undated rows never do
    pub fn filter<T: Timestamped + Clone>(&self, records: &[T]) -> Vec<T> {
        records
            .iter()
            .filter(|r| r.timestamp().is_some_and(|ts| self.contains(ts.date())))
            .cloned()
            .collect()
    }
}

/// Rows with no usable timestamp, which no window can select
pub fn count_undated<T: Timestamped>(records: &[T]) -> usize {
    records.iter().filter(|r| r.timestamp().is_none()).count()
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
