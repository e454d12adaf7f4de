//! Quote assembly: code lookup, calculation and the status shown to visitors.
//!
//! The calculator itself reports no discount problems; a [`Quote`] pairs the
//! breakdown with a [`DiscountStatus`] describing what happened to the code
//! the visitor typed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::discount::{normalize_code, DiscountCatalog, DiscountLookup};
use crate::error::PricingResult;
use crate::estimate::{calculate_estimate_with, EstimateBreakdown, EstimateOptions};
use crate::inputs::PricingInputs;
use crate::model::PricingModel;

/// What happened to the discount code attached to a quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountStatus {
    /// No code was entered
    None,
    Applied,
    NotApplicable,
    NotFound,
    Inactive,
    Expired,
    InvalidCode,
    /// The code exists but its catalog entry has an unusable amount
    InvalidDiscount,
}

impl DiscountStatus {
    /// Message for the visitor, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            DiscountStatus::None => None,
            DiscountStatus::Applied => Some("Discount applied"),
            DiscountStatus::NotApplicable => Some("This discount does not apply to your selection"),
            DiscountStatus::NotFound => Some("Discount code not found"),
            DiscountStatus::Inactive => Some("This discount code is no longer active"),
            DiscountStatus::Expired => Some("This discount code has expired"),
            DiscountStatus::InvalidCode => Some("Discount codes contain only letters, digits, '-' and '_'"),
            DiscountStatus::InvalidDiscount => Some("This discount code cannot be applied"),
        }
    }

    pub fn is_problem(&self) -> bool {
        !matches!(self, DiscountStatus::None | DiscountStatus::Applied)
    }
}

/// A priced selection ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub inputs: PricingInputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    pub discount_status: DiscountStatus,
    pub breakdown: EstimateBreakdown,
}

impl Quote {
    /// Resolve `code` against the catalog and price the selection.
    pub fn prepare(
        model: &PricingModel,
        inputs: PricingInputs,
        catalog: &DiscountCatalog,
        code: Option<&str>,
        now: DateTime<Utc>,
        options: &EstimateOptions,
    ) -> PricingResult<Self> {
        let raw_code = code.map(str::trim).filter(|c| !c.is_empty());

        let (discount_code, lookup_status, discount) = match raw_code {
            None => (None, DiscountStatus::None, None),
            Some(raw) => match normalize_code(raw) {
                Err(_) => (Some(raw.to_string()), DiscountStatus::InvalidCode, None),
                Ok(normalized) => {
                    let (status, discount) = match catalog.lookup(&normalized, now) {
                        DiscountLookup::Found(discount) => (DiscountStatus::Applied, Some(discount)),
                        DiscountLookup::NotFound => (DiscountStatus::NotFound, None),
                        DiscountLookup::Inactive => (DiscountStatus::Inactive, None),
                        DiscountLookup::Expired => (DiscountStatus::Expired, None),
                        DiscountLookup::Invalid(_) => (DiscountStatus::InvalidDiscount, None),
                    };
                    (Some(normalized), status, discount)
                }
            },
        };

        let breakdown = calculate_estimate_with(model, &inputs, discount, options)?;

        let discount_status = if discount.is_some() && !breakdown.discount_applied {
            DiscountStatus::NotApplicable
        } else {
            lookup_status
        };

        if discount_status.is_problem() {
            debug!("Discount code {:?}: {:?}", discount_code, discount_status);
        }

        let quote = Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            inputs,
            discount_code,
            discount_status,
            breakdown,
        };
        info!("Prepared quote {} total={}", quote.id, quote.breakdown.total);
        Ok(quote)
    }
}
