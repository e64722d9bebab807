//! `feedstock` binary entry point.

use std::process::ExitCode;

use clap::Parser;

use feedstock_app::AppConfig;
use feedstock_app::cli::{Cli, Outcome, run};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; quiet unless RUST_LOG says otherwise.
    feedstock_observability::init_with_default("warn");

    let result = AppConfig::from_env()
        .map(|base| cli.overrides.apply(base))
        .and_then(|config| run(cli.command, &config, &mut std::io::stdout().lock()));

    match result {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Rejected) => ExitCode::from(2),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
