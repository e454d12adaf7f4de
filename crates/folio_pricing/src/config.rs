//! Quote configuration.

use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::estimate::{EstimateOptions, OptionKeyPolicy};

/// Defaults for quoting, overridable from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfig {
    /// Currency quotes are displayed in, `None` for the rate card's own
    pub display_currency: Option<Currency>,
    /// Reject unknown multiplier option keys instead of defaulting
    pub strict_options: bool,
    /// How long fetched exchange rates stay fresh
    pub rates_ttl_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            display_currency: None,
            strict_options: false,
            rates_ttl_secs: 3600,
        }
    }
}

impl QuoteConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, falling back to defaults on bad values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(currency) = lookup("FOLIO_CURRENCY") {
            if let Ok(value) = currency.parse::<Currency>() {
                config.display_currency = Some(value);
            }
        }

        if let Some(strict) = lookup("FOLIO_STRICT_OPTIONS") {
            config.strict_options = matches!(strict.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(ttl) = lookup("FOLIO_RATES_TTL_SECS") {
            if let Ok(value) = ttl.parse::<u64>() {
                config.rates_ttl_secs = value;
            }
        }

        config
    }

    pub fn estimate_options(&self) -> EstimateOptions {
        EstimateOptions {
            option_key_policy: if self.strict_options {
                OptionKeyPolicy::Reject
            } else {
                OptionKeyPolicy::FallbackToFirst
            },
        }
    }
}
