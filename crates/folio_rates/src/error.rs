//! Error types for exchange rates.

use std::path::PathBuf;

use folio_pricing::Currency;
use thiserror::Error;

/// Result type alias for rate operations.
pub type RatesResult<T> = Result<T, RatesError>;

/// Errors that can occur while fetching or applying exchange rates.
#[derive(Error, Debug)]
pub enum RatesError {
    #[error("No exchange rate for {0}")]
    MissingRate(Currency),

    #[error("Invalid exchange rate for {currency}: {rate}")]
    InvalidRate { currency: Currency, rate: f64 },

    #[error("No exchange rates loaded")]
    NoRates,

    #[error("Rate source '{source_name}' failed: {source}")]
    Fetch {
        source_name: String,
        #[source]
        source: Box<RatesError>,
    },

    #[error("Unsupported rate file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
