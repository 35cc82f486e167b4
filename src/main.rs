mod cli;

use clap::Parser;
use cli::report::ReportArgs;
use cli::{ui, Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            unlock,
            reset,
            kind,
            start,
            end,
            config,
            export,
            interactive,
            verbose,
        } => {
            init_tracing(verbose);
            cli::report::execute(ReportArgs {
                unlock,
                reset,
                kind,
                start,
                end,
                config,
                export,
                interactive,
                verbose,
            })
        }
        Commands::Init { config, force } => {
            init_tracing(false);
            cli::init::execute(config, force)
        }
    };

    if let Err(err) = result {
        ui::error_message(&format!("Error: {}", err.user_message()));
        process::exit(1);
    }
}
