//! Error types for the pricing engine.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while loading rate cards or computing estimates.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("Unknown option '{option}' for multiplier group '{group}'")]
    UnknownOption { group: String, option: String },

    #[error("Invalid discount: {0}")]
    InvalidDiscount(String),

    #[error("Invalid discount code: {0}")]
    InvalidCode(String),

    #[error("Rate card validation failed: {0}")]
    ValidationFailed(String),

    #[error("Unsupported file format for {0}")]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
