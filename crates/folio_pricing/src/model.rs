//! Rate card data model.
//!
//! A [`PricingModel`] is fetched once per session from the CMS (or loaded from
//! disk by [`crate::loader::ModelLoader`]) and treated as read-only while
//! estimates are computed against it.

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// A selectable project type and its base price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectType {
    pub key: String,
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ProjectType {
    pub fn new(key: impl Into<String>, base_price: f64) -> Self {
        Self {
            key: key.into(),
            base_price,
            label: None,
        }
    }
}

/// An optional add-on with a flat price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub key: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Feature {
    pub fn new(key: impl Into<String>, price: f64) -> Self {
        Self {
            key: key.into(),
            price,
            label: None,
        }
    }
}

/// One choice inside a multiplier group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierOption {
    pub option_key: String,
    pub multiplier: f64,
}

impl MultiplierOption {
    pub fn new(option_key: impl Into<String>, multiplier: f64) -> Self {
        Self {
            option_key: option_key.into(),
            multiplier,
        }
    }
}

/// A named pricing axis whose selected option scales the cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiplierGroup {
    pub key: String,
    pub options: Vec<MultiplierOption>,
}

impl MultiplierGroup {
    pub fn new(key: impl Into<String>, options: Vec<MultiplierOption>) -> Self {
        Self {
            key: key.into(),
            options,
        }
    }

    /// The option used when the caller made no choice.
    pub fn default_option(&self) -> Option<&MultiplierOption> {
        self.options.first()
    }

    pub fn option(&self, option_key: &str) -> Option<&MultiplierOption> {
        self.options.iter().find(|o| o.option_key == option_key)
    }
}

/// The four multiplier axes an estimate is priced along.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MultiplierDimension {
    Complexity,
    Timeline,
    Tech,
    ClientType,
}

impl MultiplierDimension {
    pub const ALL: [MultiplierDimension; 4] = [
        MultiplierDimension::Complexity,
        MultiplierDimension::Timeline,
        MultiplierDimension::Tech,
        MultiplierDimension::ClientType,
    ];

    /// Group key used in the rate card.
    pub fn group_key(&self) -> &'static str {
        match self {
            MultiplierDimension::Complexity => "complexity",
            MultiplierDimension::Timeline => "timeline",
            MultiplierDimension::Tech => "tech",
            MultiplierDimension::ClientType => "clientType",
        }
    }
}

impl std::fmt::Display for MultiplierDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.group_key())
    }
}

/// The complete rate card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PricingModel {
    #[serde(default)]
    pub currency: Currency,
    pub project_types: Vec<ProjectType>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub multiplier_groups: Vec<MultiplierGroup>,
    /// Cost of each page beyond `included_pages`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_page: Option<f64>,
    /// Pages covered by the base price
    #[serde(default)]
    pub included_pages: u32,
}

impl PricingModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_types.push(project_type);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_group(mut self, group: MultiplierGroup) -> Self {
        self.multiplier_groups.push(group);
        self
    }

    pub fn with_price_per_page(mut self, price: f64, included_pages: u32) -> Self {
        self.price_per_page = Some(price);
        self.included_pages = included_pages;
        self
    }

    pub fn project_type(&self, key: &str) -> Option<&ProjectType> {
        self.project_types.iter().find(|p| p.key == key)
    }

    pub fn feature(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key == key)
    }

    pub fn group(&self, key: &str) -> Option<&MultiplierGroup> {
        self.multiplier_groups.iter().find(|g| g.key == key)
    }

    pub fn dimension(&self, dimension: MultiplierDimension) -> Option<&MultiplierGroup> {
        self.group(dimension.group_key())
    }

    /// Cost of the pages that exceed the included allowance.
    pub fn pages_cost(&self, num_pages: u32) -> f64 {
        match self.price_per_page {
            Some(price) => num_pages.saturating_sub(self.included_pages) as f64 * price,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_option_is_first_declared() {
        let group = MultiplierGroup::new(
            "timeline",
            vec![
                MultiplierOption::new("standard", 1.0),
                MultiplierOption::new("rush", 1.5),
            ],
        );
        assert_eq!(group.default_option().unwrap().option_key, "standard");
        assert_eq!(group.option("rush").unwrap().multiplier, 1.5);
        assert!(group.option("glacial").is_none());
    }

    #[test]
    fn test_pages_cost() {
        let model = PricingModel::new().with_price_per_page(50.0, 5);
        assert_eq!(model.pages_cost(3), 0.0);
        assert_eq!(model.pages_cost(8), 150.0);
        assert_eq!(PricingModel::new().pages_cost(100), 0.0);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "projectTypes": [{"key": "web", "basePrice": 1000}],
            "features": [{"key": "seo", "price": 200}],
            "multiplierGroups": [
                {"key": "clientType", "options": [{"optionKey": "startup", "multiplier": 0.9}]}
            ]
        }"#;
        let model: PricingModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.currency, Currency::USD);
        assert_eq!(model.project_type("web").unwrap().base_price, 1000.0);
        assert_eq!(
            model
                .dimension(MultiplierDimension::ClientType)
                .unwrap()
                .options[0]
                .multiplier,
            0.9
        );
    }
}
