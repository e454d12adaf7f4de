//! Discount definitions and lookup by code.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PricingError, PricingResult};
use crate::scope::Scope;

/// Accepted shape of a normalised discount code.
pub const CODE_PATTERN: &str = r"^[A-Z0-9][A-Z0-9_-]{1,31}$";

/// How a discount reduces the subtotal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `amount` is a percentage in [0, 100]
    Percent,
    /// `amount` is a currency amount, capped at the subtotal
    Fixed,
}

/// A resolved discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub discount_type: DiscountType,
    pub amount: f64,
    #[serde(default)]
    pub applies_to: Scope,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Discount {
    pub fn percent(amount: f64) -> Self {
        Self::new(DiscountType::Percent, amount)
    }

    pub fn fixed(amount: f64) -> Self {
        Self::new(DiscountType::Fixed, amount)
    }

    fn new(discount_type: DiscountType, amount: f64) -> Self {
        Self {
            code: None,
            discount_type,
            amount,
            applies_to: Scope::global(),
            active: true,
            expires_at: None,
            description: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.applies_to = scope;
        self
    }

    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Reduction this discount yields on a subtotal, ignoring scope.
    pub fn amount_off(&self, subtotal: f64) -> f64 {
        match self.discount_type {
            DiscountType::Percent => subtotal * (self.amount / 100.0),
            DiscountType::Fixed => self.amount.min(subtotal),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |at| at <= now)
    }

    /// Check the amount is usable for its discount type.
    pub fn validate(&self) -> PricingResult<()> {
        if !self.amount.is_finite() {
            return Err(PricingError::InvalidDiscount(format!(
                "amount must be finite, got {}",
                self.amount
            )));
        }
        match self.discount_type {
            DiscountType::Percent if !(0.0..=100.0).contains(&self.amount) => {
                Err(PricingError::InvalidDiscount(format!(
                    "percent amount must be within [0, 100], got {}",
                    self.amount
                )))
            }
            DiscountType::Fixed if self.amount < 0.0 => Err(PricingError::InvalidDiscount(format!(
                "fixed amount must be non-negative, got {}",
                self.amount
            ))),
            _ => Ok(()),
        }
    }
}

/// Trim and upper-case a code entered by a visitor, rejecting malformed codes.
pub fn normalize_code(raw: &str) -> PricingResult<String> {
    let code = raw.trim().to_uppercase();
    let pattern = Regex::new(CODE_PATTERN).map_err(|e| PricingError::InvalidCode(e.to_string()))?;
    if !pattern.is_match(&code) {
        return Err(PricingError::InvalidCode(raw.trim().to_string()));
    }
    Ok(code)
}

/// Outcome of looking up a code in a [`DiscountCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountLookup<'a> {
    Found(&'a Discount),
    NotFound,
    Inactive,
    Expired,
    /// The catalog entry exists but its amount cannot be applied
    Invalid(String),
}

/// The set of discount codes currently on offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCatalog {
    #[serde(default)]
    pub discounts: Vec<Discount>,
}

impl DiscountCatalog {
    pub fn new(discounts: Vec<Discount>) -> Self {
        Self { discounts }
    }

    /// Find a discount by code, accounting for its active flag, expiry and amount.
    ///
    /// `code` must already be normalised; stored codes are compared
    /// case-insensitively. Entries whose amount fails [`Discount::validate`]
    /// are never handed out.
    pub fn lookup(&self, code: &str, now: DateTime<Utc>) -> DiscountLookup<'_> {
        let found = self.discounts.iter().find(|d| {
            d.code
                .as_deref()
                .map_or(false, |c| c.trim().eq_ignore_ascii_case(code))
        });

        match found {
            None => {
                debug!("Discount code {} not in catalog", code);
                DiscountLookup::NotFound
            }
            Some(d) if !d.active => DiscountLookup::Inactive,
            Some(d) if d.is_expired(now) => DiscountLookup::Expired,
            Some(d) => match d.validate() {
                Ok(()) => DiscountLookup::Found(d),
                Err(e) => {
                    warn!("Discount code {} is misconfigured: {}", code, e);
                    DiscountLookup::Invalid(e.to_string())
                }
            },
        }
    }

    /// Validate every discount, returning the messages for the invalid ones.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        for (index, discount) in self.discounts.iter().enumerate() {
            let label = discount
                .code
                .clone()
                .unwrap_or_else(|| format!("#{}", index + 1));

            match &discount.code {
                None => problems.push(format!("Discount {} has no code", label)),
                Some(code) => match normalize_code(code) {
                    Ok(normalized) => {
                        if seen.contains(&normalized) {
                            problems.push(format!("Duplicate discount code: {}", normalized));
                        }
                        seen.push(normalized);
                    }
                    Err(e) => problems.push(e.to_string()),
                },
            }

            if let Err(e) = discount.validate() {
                problems.push(format!("Discount {}: {}", label, e));
            }
        }

        problems
    }
}
