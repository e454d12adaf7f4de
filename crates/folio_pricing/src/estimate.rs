//! Estimate calculation.
//!
//! Combines the selected project type's base price, feature add-ons and page
//! count, scales the sum by the product of the four multiplier options, then
//! applies an optional discount when its scope matches the selection.
//!
//! The calculation is a pure function of `(model, inputs, discount)`: nothing
//! is cached between calls and no rounding happens here. Presentation code is
//! expected to round consistently (see `folio_rates::money`).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::Currency;
use crate::discount::Discount;
use crate::error::{PricingError, PricingResult};
use crate::inputs::PricingInputs;
use crate::model::{MultiplierDimension, PricingModel};
use crate::scope::{matches_scope, ScopeSelection};

/// What to do when a multiplier option key is present but not in its group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKeyPolicy {
    /// Use the group's first declared option, as for an unset key
    #[default]
    FallbackToFirst,
    /// Fail with [`PricingError::UnknownOption`]
    Reject,
}

/// Knobs for [`calculate_estimate_with`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOptions {
    pub option_key_policy: OptionKeyPolicy,
}

impl EstimateOptions {
    pub fn strict() -> Self {
        Self {
            option_key_policy: OptionKeyPolicy::Reject,
        }
    }
}

/// The option a dimension resolved to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMultiplier {
    pub dimension: MultiplierDimension,
    /// `None` when the model has no usable group for this dimension
    pub option_key: Option<String>,
    pub multiplier: f64,
}

/// Itemised result of one calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EstimateBreakdown {
    pub currency: Currency,
    pub base_cost: f64,
    pub features_cost: f64,
    pub pages_cost: f64,
    pub multiplier: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub discount_applied: bool,
    pub total: f64,
    pub multipliers: Vec<ResolvedMultiplier>,
}

impl EstimateBreakdown {
    /// Option key the given dimension resolved to.
    pub fn option_for(&self, dimension: MultiplierDimension) -> Option<&str> {
        self.multipliers
            .iter()
            .find(|m| m.dimension == dimension)
            .and_then(|m| m.option_key.as_deref())
    }
}

/// Calculate an estimate using the default [`EstimateOptions`].
pub fn calculate_estimate(
    model: &PricingModel,
    inputs: &PricingInputs,
    discount: Option<&Discount>,
) -> PricingResult<EstimateBreakdown> {
    calculate_estimate_with(model, inputs, discount, &EstimateOptions::default())
}

/// Calculate an estimate.
///
/// Fails only when the project type is not in the model, or when an option key
/// is unknown under [`OptionKeyPolicy::Reject`].
pub fn calculate_estimate_with(
    model: &PricingModel,
    inputs: &PricingInputs,
    discount: Option<&Discount>,
    options: &EstimateOptions,
) -> PricingResult<EstimateBreakdown> {
    let project_type = model
        .project_type(&inputs.project_type_key)
        .ok_or_else(|| PricingError::UnknownProjectType(inputs.project_type_key.clone()))?;

    let base_cost = project_type.base_price;

    let features_cost: f64 = model
        .features
        .iter()
        .filter(|f| inputs.has_feature(&f.key))
        .map(|f| f.price)
        .sum();

    let pages_cost = model.pages_cost(inputs.num_pages);

    let multipliers = resolve_multipliers(model, inputs, options)?;

    let multiplier: f64 = multipliers.iter().map(|m| m.multiplier).product();
    let subtotal = (base_cost + features_cost + pages_cost) * multiplier;

    let client_type_key = multipliers
        .iter()
        .find(|m| m.dimension == MultiplierDimension::ClientType)
        .and_then(|m| m.option_key.as_deref())
        .unwrap_or_default();

    let (discount_amount, discount_applied) = match discount {
        Some(discount) => {
            let selection = ScopeSelection {
                project_type_key: &project_type.key,
                selected_feature_keys: &inputs.selected_feature_keys,
                client_type_key,
            };
            if matches_scope(&discount.applies_to, &selection) {
                (discount.amount_off(subtotal), true)
            } else {
                debug!(
                    "Discount {:?} does not apply to selection for {}",
                    discount.code, project_type.key
                );
                (0.0, false)
            }
        }
        None => (0.0, false),
    };

    let total = (subtotal - discount_amount).max(0.0);

    debug!(
        "Estimate for {}: base={} features={} pages={} x{} = {} - {} = {}",
        project_type.key,
        base_cost,
        features_cost,
        pages_cost,
        multiplier,
        subtotal,
        discount_amount,
        total
    );

    Ok(EstimateBreakdown {
        currency: model.currency,
        base_cost,
        features_cost,
        pages_cost,
        multiplier,
        subtotal,
        discount_amount,
        discount_applied,
        total,
        multipliers,
    })
}

/// Resolve the option every dimension prices with, applying defaults and the
/// unknown-key policy.
pub fn resolve_multipliers(
    model: &PricingModel,
    inputs: &PricingInputs,
    options: &EstimateOptions,
) -> PricingResult<Vec<ResolvedMultiplier>> {
    MultiplierDimension::ALL
        .iter()
        .map(|dimension| resolve_multiplier(model, inputs, *dimension, options.option_key_policy))
        .collect()
}

fn resolve_multiplier(
    model: &PricingModel,
    inputs: &PricingInputs,
    dimension: MultiplierDimension,
    policy: OptionKeyPolicy,
) -> PricingResult<ResolvedMultiplier> {
    let Some(group) = model.dimension(dimension) else {
        debug!("No multiplier group for {}, using 1.0", dimension);
        return Ok(ResolvedMultiplier {
            dimension,
            option_key: None,
            multiplier: 1.0,
        });
    };

    let chosen = match inputs.option_key(dimension) {
        None => group.default_option(),
        Some(key) => match group.option(key) {
            Some(option) => Some(option),
            None if policy == OptionKeyPolicy::Reject => {
                return Err(PricingError::UnknownOption {
                    group: group.key.clone(),
                    option: key.to_string(),
                });
            }
            None => {
                debug!("Unknown option {} for {}, falling back to first option", key, group.key);
                group.default_option()
            }
        },
    };

    Ok(match chosen {
        Some(option) => ResolvedMultiplier {
            dimension,
            option_key: Some(option.option_key.clone()),
            multiplier: option.multiplier,
        },
        None => ResolvedMultiplier {
            dimension,
            option_key: None,
            multiplier: 1.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feature, MultiplierGroup, MultiplierOption, ProjectType};
    use crate::scope::Scope;

    fn single_option_model(multiplier: f64) -> PricingModel {
        let mut model = PricingModel::new()
            .with_project_type(ProjectType::new("web", 1000.0))
            .with_feature(Feature::new("seo", 200.0));
        for dimension in MultiplierDimension::ALL {
            model = model.with_group(MultiplierGroup::new(
                dimension.group_key(),
                vec![MultiplierOption::new("only", multiplier)],
            ));
        }
        model
    }

    fn tiered_model() -> PricingModel {
        PricingModel::new()
            .with_project_type(ProjectType::new("web", 1000.0))
            .with_group(MultiplierGroup::new(
                "timeline",
                vec![
                    MultiplierOption::new("standard", 1.0),
                    MultiplierOption::new("rush", 1.5),
                ],
            ))
            .with_group(MultiplierGroup::new(
                "clientType",
                vec![
                    MultiplierOption::new("business", 1.0),
                    MultiplierOption::new("nonprofit", 0.8),
                ],
            ))
    }

    #[test]
    fn test_end_to_end_without_discount() {
        let model = single_option_model(1.5);
        let inputs = PricingInputs::new("web").with_feature("seo");

        let breakdown = calculate_estimate(&model, &inputs, None).unwrap();
        assert_eq!(breakdown.base_cost, 1000.0);
        assert_eq!(breakdown.features_cost, 200.0);
        assert_eq!(breakdown.multiplier, 5.0625);
        assert_eq!(breakdown.subtotal, 6075.0);
        assert_eq!(breakdown.discount_amount, 0.0);
        assert_eq!(breakdown.total, 6075.0);
        assert!(!breakdown.discount_applied);
    }

    #[test]
    fn test_unknown_project_type_fails() {
        let model = single_option_model(1.0);
        let err = calculate_estimate(&model, &PricingInputs::new("kiosk"), None).unwrap_err();
        assert!(matches!(err, PricingError::UnknownProjectType(key) if key == "kiosk"));
    }

    #[test]
    fn test_unknown_feature_is_ignored() {
        let model = single_option_model(1.0);
        let inputs = PricingInputs::new("web").with_feature("blockchain");

        let breakdown = calculate_estimate(&model, &inputs, None).unwrap();
        assert_eq!(breakdown.features_cost, 0.0);
        assert_eq!(breakdown.subtotal, 1000.0);
    }

    #[test]
    fn test_unset_option_defaults_to_first() {
        let breakdown = calculate_estimate(&tiered_model(), &PricingInputs::new("web"), None).unwrap();
        assert_eq!(breakdown.option_for(MultiplierDimension::Timeline), Some("standard"));
        assert_eq!(breakdown.multiplier, 1.0);
    }

    #[test]
    fn test_selected_option_applies() {
        let inputs = PricingInputs::new("web")
            .with_option(MultiplierDimension::Timeline, "rush")
            .with_option(MultiplierDimension::ClientType, "nonprofit");

        let breakdown = calculate_estimate(&tiered_model(), &inputs, None).unwrap();
        assert!((breakdown.multiplier - 1.2).abs() < 1e-9);
        assert!((breakdown.subtotal - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_option_policy() {
        let inputs = PricingInputs::new("web").with_option(MultiplierDimension::Timeline, "yesterday");

        let lenient = calculate_estimate(&tiered_model(), &inputs, None).unwrap();
        assert_eq!(lenient.option_for(MultiplierDimension::Timeline), Some("standard"));

        let strict = calculate_estimate_with(&tiered_model(), &inputs, None, &EstimateOptions::strict());
        assert!(matches!(
            strict,
            Err(PricingError::UnknownOption { ref group, ref option }) if group == "timeline" && option == "yesterday"
        ));
    }

    #[test]
    fn test_missing_group_contributes_identity() {
        let breakdown = calculate_estimate(&tiered_model(), &PricingInputs::new("web"), None).unwrap();
        assert_eq!(breakdown.option_for(MultiplierDimension::Tech), None);
        assert_eq!(breakdown.multiplier, 1.0);
    }

    #[test]
    fn test_pages_are_priced_beyond_allowance() {
        let model = tiered_model().with_price_per_page(100.0, 5);
        let inputs = PricingInputs::new("web")
            .with_pages(8)
            .with_option(MultiplierDimension::Timeline, "rush");

        let breakdown = calculate_estimate(&model, &inputs, None).unwrap();
        assert_eq!(breakdown.pages_cost, 300.0);
        assert_eq!(breakdown.subtotal, 1950.0);
    }

    #[test]
    fn test_discount_scope_uses_resolved_client_type() {
        let discount = Discount::percent(50.0).with_scope(Scope::global().for_client_types(["business"]));

        let breakdown = calculate_estimate(&tiered_model(), &PricingInputs::new("web"), Some(&discount)).unwrap();
        assert!(breakdown.discount_applied);
        assert_eq!(breakdown.total, 500.0);
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let model = single_option_model(1.0);
        let discount = Discount::fixed(5000.0);

        let breakdown = calculate_estimate(&model, &PricingInputs::new("web"), Some(&discount)).unwrap();
        assert_eq!(breakdown.discount_amount, 1000.0);
        assert_eq!(breakdown.total, 0.0);
    }
}
