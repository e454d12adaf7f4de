//! Folio CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or input
//! - 3: Validation failure

use std::process::ExitCode;

use clap::Parser;
use folio_pricing::PricingError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod render;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_INPUT: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // `folio` prefixes the CLI and library targets alike
    let level = if cli.verbose {
        "folio=debug"
    } else if cli.quiet {
        "folio=warn"
    } else {
        "folio=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("warn,{}", level)));

    // Logging may already be initialized by a test harness
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Estimate(args) => commands::estimate::execute(args).await,
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Scope(args) => commands::scope::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<commands::validate::ValidationFailed>().is_some() {
            return ExitCodes::VALIDATION_FAILURE;
        }
        match cause.downcast_ref::<PricingError>() {
            Some(PricingError::Io(_)) => return ExitCodes::GENERAL_ERROR,
            Some(_) => return ExitCodes::INVALID_INPUT,
            None => {}
        }
    }

    ExitCodes::GENERAL_ERROR
}
