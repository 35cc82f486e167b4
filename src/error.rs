use std::path::PathBuf;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid subscriber pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{table} table is missing required column '{column}'")]
    Schema { table: String, column: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid date range: {start} > {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Nothing to export")]
    NothingToExport,

    #[error("{0}: {1}")]
    WithContext(String, Box<ReportError>),
}

impl ReportError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn schema<T: Into<String>, C: Into<String>>(table: T, column: C) -> Self {
        Self::Schema {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Add context to an error
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        ReportError::WithContext(context.into(), Box::new(self))
    }

    /// True when the error means an input file does not follow the expected layout
    pub fn is_template_mismatch(&self) -> bool {
        match self {
            ReportError::Schema { .. } => true,
            ReportError::WithContext(_, err) => err.is_template_mismatch(),
            _ => false,
        }
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            ReportError::Schema { table, column } => format!(
                "The {table} file does not match the expected template (missing column '{column}')"
            ),
            ReportError::InvalidDateRange { .. } => {
                "The start date must be before or equal to the end date".to_string()
            }
            ReportError::NothingToExport => "No data to export".to_string(),
            ReportError::ConfigNotFound { path } => {
                format!("Configuration file not found at: {}", path.display())
            }
            ReportError::WithContext(ctx, err) => format!("{}: {}", ctx, err.user_message()),
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = result::Result<T, ReportError>;

// Helper trait for adding context to results
pub trait ResultExt<T, E> {
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T, E> for result::Result<T, E>
where
    E: Into<ReportError>,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| {
            let report_err: ReportError = err.into();
            report_err.with_context(context())
        })
    }
}
