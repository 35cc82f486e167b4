pub mod error;
pub mod init;
pub mod interactive;
pub mod progress;
pub mod report;
pub mod ui;

use clap::{Parser, Subcommand, ValueEnum};
use phoning_report::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "phoning")]
#[command(
    author,
    version,
    about = "Per-agent unlock and PIN reset reporting from operation logs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the unlock or agent report for a date range
    Report {
        /// CSV export of the unlock log
        #[clap(short, long, default_value = "unlock.csv")]
        unlock: String,

        /// CSV export of the PIN reset log
        #[clap(short, long, default_value = "reset_pin.csv")]
        reset: String,

        /// Report to display
        #[clap(short, long, value_enum, required_unless_present = "interactive")]
        kind: Option<ReportKind>,

        /// First day of the reporting period, YYYY-MM-DD (defaults to the earliest log)
        #[clap(long)]
        start: Option<String>,

        /// Last day of the reporting period, YYYY-MM-DD (defaults to the latest log)
        #[clap(long)]
        end: Option<String>,

        /// Configuration file path
        #[clap(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: String,

        /// Export the displayed table to this CSV file
        #[clap(short, long)]
        export: Option<String>,

        /// Use interactive mode with dialog prompts
        #[clap(short, long, default_value_t = false)]
        interactive: bool,

        /// Enable verbose output with additional information
        #[clap(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Write the default configuration file
    Init {
        /// Configuration file path
        #[clap(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: String,

        /// Overwrite an existing configuration file
        #[clap(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Unlocks, reset-only and unauthorized actions per agent
    Unlock,

    /// Approved, rejected and locked PIN resets per agent
    Agent,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Unlock => "Unlock report",
            ReportKind::Agent => "Agent PIN reset report",
        }
    }

    /// File name used when exporting without an explicit path
    pub fn default_export_file(&self) -> &'static str {
        match self {
            ReportKind::Unlock => "unlock_report.csv",
            ReportKind::Agent => "agent_report.csv",
        }
    }
}
