//! Rate card validation.

use std::collections::HashSet;

use crate::discount::DiscountCatalog;
use crate::model::{MultiplierDimension, PricingModel};

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Validator for rate cards and discount catalogs.
pub struct ModelValidator;

impl ModelValidator {
    /// Validate the structure of a rate card.
    pub fn validate_model(model: &PricingModel) -> ValidationResult {
        let mut result = ValidationResult::new();

        if model.project_types.is_empty() {
            result.add_error("Rate card defines no project types");
        }

        let mut seen = HashSet::new();
        for project_type in &model.project_types {
            if project_type.key.trim().is_empty() {
                result.add_error("Project type has an empty key");
            }
            if !seen.insert(project_type.key.as_str()) {
                result.add_error(format!("Duplicate project type key: {}", project_type.key));
            }
            if !is_price(project_type.base_price) {
                result.add_error(format!(
                    "Project type '{}' has invalid base price {}",
                    project_type.key, project_type.base_price
                ));
            }
        }

        let mut seen = HashSet::new();
        for feature in &model.features {
            if !seen.insert(feature.key.as_str()) {
                result.add_error(format!("Duplicate feature key: {}", feature.key));
            }
            if !is_price(feature.price) {
                result.add_error(format!(
                    "Feature '{}' has invalid price {}",
                    feature.key, feature.price
                ));
            }
        }

        if let Some(price) = model.price_per_page {
            if !is_price(price) {
                result.add_error(format!("Invalid price per page {}", price));
            }
        }

        result.merge(Self::validate_groups(model));
        result
    }

    fn validate_groups(model: &PricingModel) -> ValidationResult {
        let mut result = ValidationResult::new();

        let mut seen = HashSet::new();
        for group in &model.multiplier_groups {
            if !seen.insert(group.key.as_str()) {
                result.add_error(format!("Duplicate multiplier group: {}", group.key));
            }

            if group.options.is_empty() {
                result.add_error(format!("Multiplier group '{}' has no options", group.key));
            }

            let mut option_keys = HashSet::new();
            for option in &group.options {
                if !option_keys.insert(option.option_key.as_str()) {
                    result.add_error(format!(
                        "Duplicate option '{}' in group '{}'",
                        option.option_key, group.key
                    ));
                }
                if !(option.multiplier.is_finite() && option.multiplier > 0.0) {
                    result.add_error(format!(
                        "Option '{}' in group '{}' must have a positive multiplier, got {}",
                        option.option_key, group.key, option.multiplier
                    ));
                }
            }

            if !MultiplierDimension::ALL
                .iter()
                .any(|d| d.group_key() == group.key)
            {
                result.add_warning(format!(
                    "Multiplier group '{}' is not used by estimates",
                    group.key
                ));
            }
        }

        for dimension in MultiplierDimension::ALL {
            if model.dimension(dimension).is_none() {
                result.add_warning(format!(
                    "No '{}' multiplier group; estimates will use 1.0",
                    dimension
                ));
            }
        }

        result
    }

    /// Validate a discount catalog, optionally against the rate card its scopes reference.
    pub fn validate_catalog(catalog: &DiscountCatalog, model: Option<&PricingModel>) -> ValidationResult {
        let mut result = ValidationResult::new();

        for problem in catalog.problems() {
            result.add_error(problem);
        }

        let Some(model) = model else {
            return result;
        };

        let client_types = model.dimension(MultiplierDimension::ClientType);
        for discount in &catalog.discounts {
            let code = discount.code.as_deref().unwrap_or("<no code>");
            let scope = &discount.applies_to;

            for key in &scope.project_type_keys {
                if model.project_type(key).is_none() {
                    result.add_warning(format!("Discount {} references unknown project type '{}'", code, key));
                }
            }
            for key in &scope.feature_keys {
                if model.feature(key).is_none() {
                    result.add_warning(format!("Discount {} references unknown feature '{}'", code, key));
                }
            }
            for key in &scope.client_type_keys {
                if client_types.and_then(|g| g.option(key)).is_none() {
                    result.add_warning(format!("Discount {} references unknown client type '{}'", code, key));
                }
            }
        }

        result
    }
}

fn is_price(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
