//! Scope command - Check whether a discount code applies to a selection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use tracing::info;

use folio_pricing::{
    explain_mismatch, normalize_code, resolve_multipliers, DiscountCatalog, DiscountLookup, EstimateOptions,
    ModelLoader, MultiplierDimension, PricingInputs, PricingModel, Scope, ScopeAxis, ScopeSelection,
};

#[derive(Args)]
pub struct ScopeArgs {
    /// Rate card used to resolve the default client type
    #[arg(short, long, env = "FOLIO_MODEL")]
    model: PathBuf,

    /// Discount catalog file
    #[arg(long, env = "FOLIO_DISCOUNTS")]
    discounts: PathBuf,

    /// Discount code to check
    #[arg(long)]
    code: String,

    /// Project type key
    #[arg(short, long)]
    project_type: String,

    /// Selected feature key (repeatable)
    #[arg(short, long = "feature")]
    features: Vec<String>,

    /// Client type option key (defaults to the rate card's first option)
    #[arg(long)]
    client_type: Option<String>,
}

pub async fn execute(args: ScopeArgs) -> Result<()> {
    let model = ModelLoader::read_model(&args.model)
        .with_context(|| format!("Failed to load rate card {:?}", args.model))?;
    let catalog = ModelLoader::read_catalog(&args.discounts)
        .with_context(|| format!("Failed to load discount catalog {:?}", args.discounts))?;
    let code = normalize_code(&args.code)?;
    info!("Checking scope of {}", code);

    println!("{}", check(&model, &catalog, &code, &args)?);
    Ok(())
}

fn check(model: &PricingModel, catalog: &DiscountCatalog, code: &str, args: &ScopeArgs) -> Result<String> {
    let discount = match catalog.lookup(code, Utc::now()) {
        DiscountLookup::Found(discount) => discount,
        DiscountLookup::NotFound => anyhow::bail!("Discount code not found: {}", code),
        DiscountLookup::Inactive => return Ok(format!("⚠️  {} is no longer active", code)),
        DiscountLookup::Expired => return Ok(format!("⚠️  {} has expired", code)),
        DiscountLookup::Invalid(reason) => return Ok(format!("⚠️  {} cannot be applied: {}", code, reason)),
    };

    // Match against the client type an estimate would actually price with.
    let mut inputs = PricingInputs::new(args.project_type.clone());
    if let Some(client_type) = &args.client_type {
        inputs = inputs.with_option(MultiplierDimension::ClientType, client_type.clone());
    }
    let multipliers = resolve_multipliers(model, &inputs, &EstimateOptions::default())?;
    let client_type_key = multipliers
        .iter()
        .find(|m| m.dimension == MultiplierDimension::ClientType)
        .and_then(|m| m.option_key.as_deref())
        .unwrap_or_default();

    let selection = ScopeSelection {
        project_type_key: &args.project_type,
        selected_feature_keys: &args.features,
        client_type_key,
    };

    Ok(match explain_mismatch(&discount.applies_to, &selection) {
        None if discount.applies_to.is_unrestricted() => format!("✅ {} applies to every selection", code),
        None => format!("✅ {} applies to this selection", code),
        Some(axis) => format!(
            "❌ {} does not apply: {} must be one of [{}]",
            code,
            axis,
            allowed(&discount.applies_to, axis).join(", ")
        ),
    })
}

fn allowed(scope: &Scope, axis: ScopeAxis) -> &[String] {
    match axis {
        ScopeAxis::ProjectType => &scope.project_type_keys,
        ScopeAxis::Feature => &scope.feature_keys,
        ScopeAxis::ClientType => &scope.client_type_keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_pricing::{Discount, MultiplierGroup, MultiplierOption, ProjectType};

    fn args(project: &str, features: &[&str]) -> ScopeArgs {
        ScopeArgs {
            model: PathBuf::from("rate-card.yaml"),
            discounts: PathBuf::from("discounts.yaml"),
            code: String::new(),
            project_type: project.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
            client_type: None,
        }
    }

    fn model() -> PricingModel {
        PricingModel::new()
            .with_project_type(ProjectType::new("web", 1000.0))
            .with_group(MultiplierGroup::new(
                "clientType",
                vec![MultiplierOption::new("business", 1.0), MultiplierOption::new("nonprofit", 0.8)],
            ))
    }

    fn catalog() -> DiscountCatalog {
        DiscountCatalog::new(vec![
            Discount::percent(10.0).with_code("ALL"),
            Discount::fixed(100.0)
                .with_code("SEO")
                .with_scope(Scope::global().for_features(["seo", "analytics"])),
            Discount::percent(5.0)
                .with_code("BIZ")
                .with_scope(Scope::global().for_client_types(["business"])),
            Discount::fixed(-50.0).with_code("BROKEN"),
        ])
    }

    #[test]
    fn test_check_reports_match_and_mismatch() {
        let (model, catalog) = (model(), catalog());

        let global = check(&model, &catalog, "ALL", &args("web", &[])).unwrap();
        assert!(global.contains("applies to every selection"));

        let matched = check(&model, &catalog, "SEO", &args("web", &["analytics"])).unwrap();
        assert!(matched.contains("applies to this selection"));

        let missed = check(&model, &catalog, "SEO", &args("web", &["blog"])).unwrap();
        assert!(missed.contains("features must be one of [seo, analytics]"));
    }

    #[test]
    fn test_check_resolves_default_client_type() {
        let (model, catalog) = (model(), catalog());

        let unset = check(&model, &catalog, "BIZ", &args("web", &[])).unwrap();
        assert!(unset.contains("applies to this selection"), "{}", unset);

        let mut nonprofit = args("web", &[]);
        nonprofit.client_type = Some("nonprofit".to_string());
        let missed = check(&model, &catalog, "BIZ", &nonprofit).unwrap();
        assert!(missed.contains("client type must be one of [business]"));
    }

    #[test]
    fn test_check_reports_misconfigured_code() {
        let report = check(&model(), &catalog(), "BROKEN", &args("web", &[])).unwrap();
        assert!(report.contains("cannot be applied"));
    }

    #[test]
    fn test_check_unknown_code() {
        assert!(check(&model(), &catalog(), "NOPE", &args("web", &[])).is_err());
    }
}
