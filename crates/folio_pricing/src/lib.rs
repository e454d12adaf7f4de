//! # folio_pricing
//!
//! Pricing estimate engine behind the portfolio site's project intake form.
//!
//! A visitor picks a project type, a page count, optional feature add-ons and
//! one option on each of four multiplier axes (complexity, timeline, tech,
//! client type). The engine turns that selection and the current rate card
//! into an itemised [`EstimateBreakdown`], optionally reduced by a discount
//! whose [`Scope`] matches the selection.
//!
//! ## Modules
//!
//! - **model**: the rate card ([`PricingModel`])
//! - **inputs**: the typed selection ([`PricingInputs`])
//! - **scope**: discount eligibility ([`matches_scope`])
//! - **estimate**: the calculator ([`calculate_estimate`])
//! - **discount** / **quote**: code lookup and the visitor-facing status
//! - **validator** / **loader**: rate card files on disk
//!
//! ## Example
//!
//! ```rust
//! use folio_pricing::{calculate_estimate, Discount, Feature, PricingInputs, PricingModel, ProjectType};
//!
//! let model = PricingModel::new()
//!     .with_project_type(ProjectType::new("web", 1000.0))
//!     .with_feature(Feature::new("seo", 200.0));
//!
//! let inputs = PricingInputs::new("web").with_feature("seo");
//! let breakdown = calculate_estimate(&model, &inputs, Some(&Discount::percent(10.0))).unwrap();
//!
//! assert_eq!(breakdown.subtotal, 1200.0);
//! assert_eq!(breakdown.total, 1080.0);
//! ```

pub mod config;
pub mod currency;
pub mod discount;
pub mod error;
pub mod estimate;
pub mod inputs;
pub mod loader;
pub mod model;
pub mod quote;
pub mod scope;
pub mod validator;

pub use config::QuoteConfig;
pub use currency::Currency;
pub use discount::{normalize_code, Discount, DiscountCatalog, DiscountLookup, DiscountType};
pub use error::{PricingError, PricingResult};
pub use estimate::{
    calculate_estimate, calculate_estimate_with, resolve_multipliers, EstimateBreakdown, EstimateOptions,
    OptionKeyPolicy, ResolvedMultiplier,
};
pub use inputs::PricingInputs;
pub use loader::{DataFormat, ModelLoader};
pub use model::{Feature, MultiplierDimension, MultiplierGroup, MultiplierOption, PricingModel, ProjectType};
pub use quote::{DiscountStatus, Quote};
pub use scope::{explain_mismatch, matches_scope, Scope, ScopeAxis, ScopeSelection};
pub use validator::{ModelValidator, ValidationResult};
