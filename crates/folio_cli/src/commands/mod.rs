//! CLI command definitions.
//!
//! Each subcommand works on rate card and discount files exported from the
//! site's CMS.

use clap::{Parser, Subcommand, ValueEnum};

pub mod estimate;
pub mod scope;
pub mod validate;

/// Folio - project estimate calculator
#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Folio - project estimate calculator")]
#[command(long_about = r#"
Folio prices a project selection against the site's rate card, the same way
the intake form does.

COMMANDS:
  estimate  → Price a selection, optionally with a discount code
  validate  → Check a rate card (and discount catalog) for mistakes
  scope     → Check whether a discount code applies to a selection

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or input
  3 - Validation failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a project selection
    Estimate(estimate::EstimateArgs),

    /// Validate a rate card and discount catalog
    Validate(validate::ValidateArgs),

    /// Check a discount code's scope against a selection
    Scope(scope::ScopeArgs),
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
