use phoning_report::ReportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Dialoguer error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Report(err) => err.user_message(),
            Self::DialoguerError(err) => format!("UI interaction error: {err}"),
            Self::InvalidDate(value) => format!("Invalid date '{value}', expected YYYY-MM-DD"),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<CliError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let cli_err: CliError = err.into();
            cli_err.with_context(context())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_errors_keep_their_user_message() {
        let err: CliError = ReportError::schema("unlock", "LOG").into();
        assert!(err.user_message().contains("expected template"));
    }

    #[test]
    fn test_context_chain() {
        let result: std::result::Result<(), ReportError> = Err(ReportError::NothingToExport);
        let err = result.with_context(|| "Exporting").unwrap_err();
        assert_eq!(err.user_message(), "Exporting: No data to export");
    }
}
