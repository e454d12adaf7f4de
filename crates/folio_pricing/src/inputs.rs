//! Caller-supplied selections for an estimate.

use serde::{Deserialize, Serialize};

use crate::model::MultiplierDimension;

/// What the visitor picked in the intake form.
///
/// Multiplier choices are `None` until the visitor touches the control; an
/// unset or empty key resolves to the group's first declared option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PricingInputs {
    pub project_type_key: String,
    #[serde(default)]
    pub num_pages: u32,
    #[serde(default)]
    pub selected_feature_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_type_key: Option<String>,
}

impl PricingInputs {
    pub fn new(project_type_key: impl Into<String>) -> Self {
        Self {
            project_type_key: project_type_key.into(),
            ..Default::default()
        }
    }

    pub fn with_pages(mut self, num_pages: u32) -> Self {
        self.num_pages = num_pages;
        self
    }

    pub fn with_feature(mut self, key: impl Into<String>) -> Self {
        self.selected_feature_keys.push(key.into());
        self
    }

    pub fn with_option(mut self, dimension: MultiplierDimension, key: impl Into<String>) -> Self {
        *self.option_slot(dimension) = Some(key.into());
        self
    }

    /// The raw option key chosen for a dimension, with empty strings treated as unset.
    pub fn option_key(&self, dimension: MultiplierDimension) -> Option<&str> {
        let key = match dimension {
            MultiplierDimension::Complexity => &self.complexity_key,
            MultiplierDimension::Timeline => &self.timeline_key,
            MultiplierDimension::Tech => &self.tech_key,
            MultiplierDimension::ClientType => &self.client_type_key,
        };
        key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    fn option_slot(&mut self, dimension: MultiplierDimension) -> &mut Option<String> {
        match dimension {
            MultiplierDimension::Complexity => &mut self.complexity_key,
            MultiplierDimension::Timeline => &mut self.timeline_key,
            MultiplierDimension::Tech => &mut self.tech_key,
            MultiplierDimension::ClientType => &mut self.client_type_key,
        }
    }

    pub fn has_feature(&self, key: &str) -> bool {
        self.selected_feature_keys.iter().any(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_option_key_is_unset() {
        let inputs = PricingInputs::new("web")
            .with_option(MultiplierDimension::Tech, "")
            .with_option(MultiplierDimension::Timeline, "rush");

        assert_eq!(inputs.option_key(MultiplierDimension::Tech), None);
        assert_eq!(inputs.option_key(MultiplierDimension::Timeline), Some("rush"));
        assert_eq!(inputs.option_key(MultiplierDimension::Complexity), None);
    }
}
