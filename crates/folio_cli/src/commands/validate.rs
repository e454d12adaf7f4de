//! Validate command - Check a rate card and discount catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use thiserror::Error;
use tracing::info;

use folio_pricing::{ModelLoader, ModelValidator, ValidationResult};

/// Raised when validation finds errors, mapped to exit code 3.
#[derive(Error, Debug)]
#[error("Validation failed with {} error(s)", .errors.len())]
pub struct ValidationFailed {
    pub errors: Vec<String>,
}

impl ValidationFailed {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Rate card file (YAML, JSON or TOML)
    #[arg(short, long, env = "FOLIO_MODEL")]
    model: PathBuf,

    /// Discount catalog file
    #[arg(long, env = "FOLIO_DISCOUNTS")]
    discounts: Option<PathBuf>,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating rate card {:?}", args.model);

    let model = ModelLoader::read_model(&args.model)
        .with_context(|| format!("Failed to load rate card {:?}", args.model))?;

    println!("📋 Validating rate card...");
    let mut all = ModelValidator::validate_model(&model);
    report(&all);

    if let Some(path) = &args.discounts {
        println!("🏷️  Validating discounts...");
        let catalog = ModelLoader::read_catalog(path)
            .with_context(|| format!("Failed to load discount catalog {:?}", path))?;
        let result = ModelValidator::validate_catalog(&catalog, Some(&model));
        report(&result);
        all.merge(result);
    }

    println!();
    if all.valid {
        println!("✅ All validations passed!");
        Ok(())
    } else {
        println!("❌ Some validations failed. Please fix the issues above.");
        Err(ValidationFailed::new(all.errors).into())
    }
}

fn report(result: &ValidationResult) {
    if result.valid {
        println!("   ✅ Passed");
    } else {
        println!("   ❌ Failed:");
        for error in &result.errors {
            println!("      - {}", error);
        }
    }

    for warning in &result.warnings {
        println!("   ⚠️  {}", warning);
    }
}
