//! Phoning report - per-agent unlock and PIN reset reporting
//!
//! Reads the unlock and PIN reset operation logs, classifies every line by
//! outcome and actor, and aggregates the results into an unlock summary and
//! an agent summary.

// Core pipeline
pub mod classify;
pub mod extract;
pub mod report;

// Inputs and configuration
pub mod config;
pub mod error;
pub mod period;
pub mod record;
pub mod table;

// Outputs
pub mod export;
pub mod render;

pub use classify::{Outcome, Rules};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use extract::{extract_lock_reason, SubscriberExtractor};
pub use period::{count_undated, DateRange};
pub use record::{ResetRecord, UnlockRecord};
pub use report::{
    build_report, build_report_from_records, AgentSummaryRow, Diagnostics, Report, SummaryRow,
    UnlockSummaryRow,
};
pub use table::{load_table, RawTable};
