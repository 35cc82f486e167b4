use super::error::{CliError, Result, ResultExt};
use super::interactive::{parse_date, ReportOptions};
use super::progress::ProgressTracker;
use super::{ui, ReportKind};
use phoning_report::{
    build_report_from_records, count_undated, export, load_table, render, DateRange, RawTable,
    Report, ReportConfig, ReportError, ResetRecord, Result as ReportResult, Rules, SummaryRow,
    UnlockRecord,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

pub struct ReportArgs {
    pub unlock: String,
    pub reset: String,
    pub kind: Option<ReportKind>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub config: String,
    pub export: Option<String>,
    pub interactive: bool,
    pub verbose: bool,
}

pub fn execute(args: ReportArgs) -> Result<()> {
    let mut progress = ProgressTracker::new("Phoning Report").with_steps(vec![
        "Loading configuration".to_string(),
        "Reading unlock log".to_string(),
        "Reading PIN reset log".to_string(),
        "Building report".to_string(),
    ]);

    progress.start_step();
    let (config, found) = ReportConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;
    let rules = Rules::from_config(&config)?;
    if found {
        progress.complete_step_with(&args.config);
    } else {
        progress.complete_step_with("built-in rules");
    }

    progress.start_step();
    let unlock_records = read_records(&args.unlock, UnlockRecord::from_table)?;
    progress.complete_step_with(&format!("{} rows", unlock_records.len()));

    progress.start_step();
    let reset_records = read_records(&args.reset, ResetRecord::from_table)?;
    progress.complete_step_with(&format!("{} rows", reset_records.len()));

    let available = DateRange::spanning(&unlock_records, &reset_records);

    let (kind, range, export_path) = if args.interactive {
        let available = available
            .ok_or_else(|| CliError::Other("Neither log file has a dated row".to_string()))?;
        let options = ReportOptions::prompt(args.kind, available, args.export.clone())?;
        (options.kind, options.range, options.export)
    } else {
        let kind = args
            .kind
            .ok_or_else(|| CliError::Other("Select a report with --kind".to_string()))?;
        let start = pick_date(args.start.as_deref(), available.map(|r| r.start()))?;
        let end = pick_date(args.end.as_deref(), available.map(|r| r.end()))?;
        (kind, DateRange::new(start, end)?, args.export.clone())
    };

    let undated = count_undated(&unlock_records) + count_undated(&reset_records);
    if undated > 0 {
        ui::warning_message(&format!(
            "{undated} rows have no usable timestamp and are left out of the period"
        ));
    }

    progress.start_step();
    let unlock_records = range.filter(&unlock_records);
    let reset_records = range.filter(&reset_records);
    let report = build_report_from_records(&unlock_records, &reset_records, &rules);
    progress.complete_step_with(&format!("{range}"));

    if args.verbose {
        print_diagnostics(&report, unlock_records.len(), reset_records.len());
    }
    if !report.diagnostics.unmapped_reasons.is_empty() {
        ui::warning_message(&format!(
            "Unlock reasons counted as unauthorized, review the reason table: {}",
            reason_list(&report.diagnostics.unmapped_reasons)
        ));
    }

    ui::section_header(&format!("{} ({range})", kind.title()));
    match kind {
        ReportKind::Unlock => {
            println!("{}", render::summary_table(&report.unlock_summary));
            print_totals(render::unlock_totals_lines(&report.unlock_totals()));
        }
        ReportKind::Agent => {
            println!("{}", render::summary_table(&report.agent_summary));
            print_totals(render::agent_totals_lines(&report.agent_totals()));
        }
    }

    if let Some(path) = export_path {
        let exported = match kind {
            ReportKind::Unlock => export_rows(&report.unlock_summary, &path),
            ReportKind::Agent => export_rows(&report.agent_summary, &path),
        };
        match exported {
            Ok(()) => ui::success_message(&format!("Report exported to {path}")),
            Err(CliError::Report(ReportError::NothingToExport)) => {
                ui::warning_message("Nothing to export, no file written")
            }
            Err(err) => return Err(err),
        }
    }

    progress.complete();
    Ok(())
}

/// Explicit date when given, otherwise the bound found in the logs
fn pick_date(value: Option<&str>, fallback: Option<NaiveDate>) -> Result<NaiveDate> {
    match (value, fallback) {
        (Some(value), _) => parse_date(value),
        (None, Some(date)) => Ok(date),
        (None, None) => Err(CliError::Other(
            "Neither log file has a dated row, pass --start and --end".to_string(),
        )),
    }
}

fn read_records<T, F>(path: &str, parse: F) -> Result<Vec<T>>
where
    F: Fn(&RawTable) -> ReportResult<Vec<T>>,
{
    if !Path::new(path).exists() {
        return Err(CliError::Other(format!("Log file not found: {path}")));
    }

    let table = load_table(path).with_context(|| format!("Failed to read {path}"))?;
    parse(&table).with_context(|| format!("Failed to parse {path}"))
}

fn reason_list(reasons: &BTreeMap<String, usize>) -> String {
    reasons
        .iter()
        .map(|(reason, count)| format!("'{reason}' x{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn export_rows<T: SummaryRow>(rows: &[T], path: &str) -> Result<()> {
    export::export_csv(rows, path)?;
    Ok(())
}

fn print_totals(lines: Vec<(String, String)>) {
    for (label, value) in lines {
        ui::total_line(&label, &value);
    }
}

fn print_diagnostics(report: &Report, unlock_rows: usize, reset_rows: usize) {
    let d = &report.diagnostics;
    ui::info_message(&format!(
        "Unlock rows in period: {unlock_rows} ({} out of scope, {} failed)",
        d.out_of_scope_unlocks, d.failed_unlocks
    ));
    ui::info_message(&format!(
        "Reset rows in period: {reset_rows} ({} out of scope, {} failed)",
        d.out_of_scope_resets, d.failed_resets
    ));
    ui::info_message(&format!(
        "Resets already counted as unlocks: {}",
        d.deduplicated_resets
    ));
    if d.missing_subscriber > 0 {
        ui::info_message(&format!(
            "Records without a subscriber number: {}",
            d.missing_subscriber
        ));
    }
    if d.ambiguous_subscriber > 0 {
        ui::info_message(&format!(
            "Records with several subscriber numbers (first one used): {}",
            d.ambiguous_subscriber
        ));
    }
    if !d.overridden_reasons.is_empty() {
        ui::info_message(&format!(
            "Unmapped reasons counted as unlocks for exception actors: {}",
            reason_list(&d.overridden_reasons)
        ));
    }
}
