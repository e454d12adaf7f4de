//! Estimate command - Price a selection against a rate card.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Args;
use tracing::{info, warn};

use folio_pricing::{
    Currency, DiscountCatalog, EstimateBreakdown, EstimateOptions, ModelLoader, ModelValidator,
    MultiplierDimension, PricingInputs, Quote, QuoteConfig,
};
use folio_rates::{convert_breakdown, FileRateSource, RateCache, SystemClock};

use super::validate::ValidationFailed;
use super::OutputFormat;
use crate::render;

#[derive(Args)]
pub struct EstimateArgs {
    /// Rate card file (YAML, JSON or TOML)
    #[arg(short, long, env = "FOLIO_MODEL")]
    pub model: PathBuf,

    /// Project type key
    #[arg(short, long)]
    pub project_type: String,

    /// Number of pages
    #[arg(long, default_value_t = 0)]
    pub pages: u32,

    /// Feature add-on key (repeatable)
    #[arg(short, long = "feature")]
    pub features: Vec<String>,

    /// Complexity option key
    #[arg(long)]
    pub complexity: Option<String>,

    /// Timeline option key
    #[arg(long)]
    pub timeline: Option<String>,

    /// Technology option key
    #[arg(long)]
    pub tech: Option<String>,

    /// Client type option key
    #[arg(long)]
    pub client_type: Option<String>,

    /// Discount catalog file
    #[arg(long, env = "FOLIO_DISCOUNTS")]
    pub discounts: Option<PathBuf>,

    /// Discount code to apply
    #[arg(long)]
    pub code: Option<String>,

    /// Display currency (defaults to the rate card's)
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Exchange rate file, required when converting currencies
    #[arg(long, env = "FOLIO_RATES")]
    pub rates: Option<PathBuf>,

    /// Fail on unknown multiplier option keys instead of using the default option
    #[arg(long)]
    pub strict_options: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl EstimateArgs {
    fn inputs(&self) -> PricingInputs {
        let mut inputs = PricingInputs::new(self.project_type.clone()).with_pages(self.pages);
        for feature in &self.features {
            inputs = inputs.with_feature(feature.clone());
        }
        let choices = [
            (MultiplierDimension::Complexity, &self.complexity),
            (MultiplierDimension::Timeline, &self.timeline),
            (MultiplierDimension::Tech, &self.tech),
            (MultiplierDimension::ClientType, &self.client_type),
        ];
        for (dimension, key) in choices {
            if let Some(key) = key {
                inputs = inputs.with_option(dimension, key.clone());
            }
        }
        inputs
    }
}

pub async fn execute(args: EstimateArgs) -> Result<()> {
    info!("Estimating {} with rate card {:?}", args.project_type, args.model);

    let config = QuoteConfig::from_env();
    let (quote, display) = build_quote(&args, &config).await?;

    match args.format {
        OutputFormat::Json => {
            let quote = Quote {
                breakdown: display,
                ..quote
            };
            let json = serde_json::to_string_pretty(&quote).context("Failed to serialize quote")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("{}", render::quote_report(&quote, &display));
        }
    }

    Ok(())
}

/// Price the selection and convert it to the display currency.
pub async fn build_quote(args: &EstimateArgs, config: &QuoteConfig) -> Result<(Quote, EstimateBreakdown)> {
    let model = ModelLoader::read_model(&args.model)
        .with_context(|| format!("Failed to load rate card {:?}", args.model))?;

    let validation = ModelValidator::validate_model(&model);
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.valid {
        return Err(ValidationFailed::new(validation.errors)).context("Rate card is invalid");
    }

    let catalog = match &args.discounts {
        Some(path) => ModelLoader::read_catalog(path)
            .with_context(|| format!("Failed to load discount catalog {:?}", path))?,
        None => DiscountCatalog::default(),
    };
    let validation = ModelValidator::validate_catalog(&catalog, Some(&model));
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.valid {
        return Err(ValidationFailed::new(validation.errors)).context("Discount catalog is invalid");
    }
    if args.code.is_some() && args.discounts.is_none() {
        warn!("--code given without --discounts; no codes can match");
    }

    let options = if args.strict_options {
        EstimateOptions::strict()
    } else {
        config.estimate_options()
    };

    let quote = Quote::prepare(
        &model,
        args.inputs(),
        &catalog,
        args.code.as_deref(),
        Utc::now(),
        &options,
    )
    .context("Failed to calculate estimate")?;

    let display_currency = args
        .currency
        .or(config.display_currency)
        .unwrap_or(model.currency);
    if display_currency == model.currency {
        let breakdown = quote.breakdown.clone();
        return Ok((quote, breakdown));
    }

    let rates_path = args.rates.as_ref().with_context(|| {
        format!(
            "--rates is required to display a {} rate card in {}",
            model.currency.code(),
            display_currency.code()
        )
    })?;

    let ttl = Duration::seconds(i64::try_from(config.rates_ttl_secs).unwrap_or(i64::MAX));
    let mut cache = RateCache::new(model.currency, ttl, Arc::new(SystemClock));
    cache
        .refresh_if_stale(&FileRateSource::new(rates_path))
        .await
        .context("Failed to load exchange rates")?;
    let table = cache.table().context("No exchange rates loaded")?;

    let converted = convert_breakdown(&quote.breakdown, table, display_currency)
        .context("Failed to convert estimate")?;
    Ok((quote, converted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_pricing::DiscountStatus;
    use std::fs;
    use tempfile::tempdir;

    const RATE_CARD: &str = r#"
projectTypes:
  - key: web
    basePrice: 1000
features:
  - key: seo
    price: 200
multiplierGroups:
  - key: complexity
    options: [{ optionKey: standard, multiplier: 1.5 }]
  - key: timeline
    options: [{ optionKey: standard, multiplier: 1.5 }]
  - key: tech
    options: [{ optionKey: standard, multiplier: 1.5 }]
  - key: clientType
    options: [{ optionKey: standard, multiplier: 1.5 }]
"#;

    fn args(model: PathBuf) -> EstimateArgs {
        EstimateArgs {
            model,
            project_type: "web".to_string(),
            pages: 0,
            features: vec!["seo".to_string()],
            complexity: None,
            timeline: None,
            tech: None,
            client_type: None,
            discounts: None,
            code: None,
            currency: None,
            rates: None,
            strict_options: false,
            format: OutputFormat::Text,
        }
    }

    #[tokio::test]
    async fn test_build_quote_with_discount_and_currency() {
        let temp = tempdir().unwrap();
        let model_path = temp.path().join("rates.yaml");
        let discounts_path = temp.path().join("discounts.yaml");
        let fx_path = temp.path().join("fx.json");
        fs::write(&model_path, RATE_CARD).unwrap();
        fs::write(
            &discounts_path,
            "discounts:\n  - code: TEN\n    discountType: percent\n    amount: 10\n",
        )
        .unwrap();
        fs::write(&fx_path, r#"{"base": "USD", "rates": {"EUR": 2.0}}"#).unwrap();

        let mut args = args(model_path);
        args.discounts = Some(discounts_path);
        args.code = Some("ten".to_string());
        args.currency = Some(Currency::EUR);
        args.rates = Some(fx_path);

        let (quote, display) = build_quote(&args, &QuoteConfig::default()).await.unwrap();
        assert_eq!(quote.discount_status, DiscountStatus::Applied);
        assert_eq!(quote.breakdown.total, 5467.5);
        assert_eq!(display.currency, Currency::EUR);
        assert_eq!(display.total, 10935.0);
    }

    #[tokio::test]
    async fn test_build_quote_rejects_invalid_catalog() {
        let temp = tempdir().unwrap();
        let model_path = temp.path().join("rates.yaml");
        let discounts_path = temp.path().join("discounts.yaml");
        fs::write(&model_path, RATE_CARD).unwrap();
        fs::write(
            &discounts_path,
            "discounts:\n  - code: NEG\n    discountType: fixed\n    amount: -250\n",
        )
        .unwrap();

        let mut args = args(model_path);
        args.discounts = Some(discounts_path);
        args.code = Some("NEG".to_string());

        let err = build_quote(&args, &QuoteConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("Discount catalog is invalid"));
        let failed = err.downcast_ref::<ValidationFailed>().unwrap();
        assert!(failed.errors.iter().any(|e| e.contains("non-negative")));
    }

    #[tokio::test]
    async fn test_build_quote_requires_rates_for_conversion() {
        let temp = tempdir().unwrap();
        let model_path = temp.path().join("rates.yaml");
        fs::write(&model_path, RATE_CARD).unwrap();

        let mut args = args(model_path);
        args.currency = Some(Currency::GBP);

        let err = build_quote(&args, &QuoteConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("--rates is required"));
    }

    #[tokio::test]
    async fn test_build_quote_strict_options() {
        let temp = tempdir().unwrap();
        let model_path = temp.path().join("rates.yaml");
        fs::write(&model_path, RATE_CARD).unwrap();

        let mut args = args(model_path);
        args.timeline = Some("overnight".to_string());

        let (quote, _) = build_quote(&args, &QuoteConfig::default()).await.unwrap();
        assert_eq!(quote.breakdown.total, 6075.0);

        args.strict_options = true;
        assert!(build_quote(&args, &QuoteConfig::default()).await.is_err());
    }
}
