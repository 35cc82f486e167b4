use crate::error::{ReportError, Result};
use crate::report::SummaryRow;
use std::fs;
use std::path::Path;

/// Serialize summary rows as CSV: one header row, integer count columns, no rank
pub fn to_csv_bytes<T: SummaryRow>(rows: &[T]) -> Result<Vec<u8>> {
    if rows.is_empty() {
        return Err(ReportError::NothingToExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))
}

/// Write summary rows to a CSV file
pub fn export_csv<T: SummaryRow, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    let bytes = to_csv_bytes(rows)?;
    fs::write(path, bytes)?;
    Ok(())
}
