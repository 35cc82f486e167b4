use super::error::{CliError, Result};
use super::ReportKind;
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use phoning_report::DateRange;

/// Choices collected from prompts in interactive mode
pub struct ReportOptions {
    pub kind: ReportKind,
    pub range: DateRange,
    pub export: Option<String>,
}

impl ReportOptions {
    /// Ask for the report kind, the period inside `available` and the export target.
    /// Values given on the command line are used as prompt defaults.
    pub fn prompt(
        kind: Option<ReportKind>,
        available: DateRange,
        export: Option<String>,
    ) -> Result<Self> {
        let theme = ColorfulTheme::default();

        let kinds = [ReportKind::Unlock, ReportKind::Agent];
        let labels: Vec<&str> = kinds.iter().map(|k| k.title()).collect();
        let default_idx = kinds.iter().position(|k| Some(*k) == kind).unwrap_or(0);
        let kind_idx = Select::with_theme(&theme)
            .with_prompt("Select the report to display")
            .items(&labels)
            .default(default_idx)
            .interact()?;
        let kind = kinds[kind_idx];

        let start = prompt_date(&theme, "Start date", available.start(), available)?;
        let end = prompt_date(&theme, "End date", available.end().max(start), available)?;
        let range = DateRange::new(start, end)?;

        let wants_export = Confirm::with_theme(&theme)
            .with_prompt("Export the report to CSV?")
            .default(export.is_some())
            .interact()?;
        let export = if wants_export {
            let path: String = Input::with_theme(&theme)
                .with_prompt("Export file")
                .default(
                    export.unwrap_or_else(|| kind.default_export_file().to_string()),
                )
                .interact_text()?;
            Some(path)
        } else {
            None
        };

        Ok(Self {
            kind,
            range,
            export,
        })
    }
}

fn prompt_date(
    theme: &ColorfulTheme,
    prompt: &str,
    default: NaiveDate,
    available: DateRange,
) -> Result<NaiveDate> {
    let value: String = Input::with_theme(theme)
        .with_prompt(format!("{prompt} ({available})"))
        .default(default.to_string())
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            match parse_date(input) {
                Ok(date) if available.contains(date) => Ok(()),
                Ok(_) => Err(format!("Pick a date between {available}")),
                Err(err) => Err(err.user_message()),
            }
        })
        .interact_text()?;

    parse_date(&value)
}

/// Parse a `YYYY-MM-DD` command line or prompt value
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-05-02 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
        );
        assert!(matches!(parse_date("02/05/2024"), Err(CliError::InvalidDate(_))));
    }
}
