//! Text rendering of quotes.

use std::fmt::Write;

use folio_pricing::{EstimateBreakdown, Quote};
use folio_rates::format_money;

/// Itemised, human-readable quote.
pub fn quote_report(quote: &Quote, breakdown: &EstimateBreakdown) -> String {
    let currency = breakdown.currency;
    let mut out = String::new();

    let _ = writeln!(out, "💰 Estimate for '{}'", quote.inputs.project_type_key);
    line(&mut out, "Base price", &format_money(breakdown.base_cost, currency));

    if !quote.inputs.selected_feature_keys.is_empty() {
        let label = format!("Features ({})", quote.inputs.selected_feature_keys.join(", "));
        line(&mut out, &label, &format_money(breakdown.features_cost, currency));
    }
    if breakdown.pages_cost > 0.0 {
        let label = format!("Pages ({})", quote.inputs.num_pages);
        line(&mut out, &label, &format_money(breakdown.pages_cost, currency));
    }

    let options: Vec<String> = breakdown
        .multipliers
        .iter()
        .filter_map(|m| {
            m.option_key
                .as_ref()
                .map(|key| format!("{}={} ×{}", m.dimension, key, m.multiplier))
        })
        .collect();
    let multiplier = if options.is_empty() {
        format!("×{}", breakdown.multiplier)
    } else {
        format!("×{} ({})", breakdown.multiplier, options.join(", "))
    };
    line(&mut out, "Multiplier", &multiplier);
    line(&mut out, "Subtotal", &format_money(breakdown.subtotal, currency));

    if breakdown.discount_applied {
        let label = match &quote.discount_code {
            Some(code) => format!("Discount ({})", code),
            None => "Discount".to_string(),
        };
        line(&mut out, &label, &format!("-{}", format_money(breakdown.discount_amount, currency)));
    }
    line(&mut out, "Total", &format_money(breakdown.total, currency));

    if quote.discount_status.is_problem() {
        if let Some(notice) = quote.discount_status.notice() {
            let _ = writeln!(out, "⚠️  {}", notice);
        }
    }

    out.trim_end().to_string()
}

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "   {:<24} {}", label, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use folio_pricing::{
        DiscountCatalog, EstimateOptions, Feature, MultiplierGroup, MultiplierOption, PricingInputs, PricingModel,
        ProjectType,
    };

    fn quote(code: Option<&str>) -> Quote {
        let model = PricingModel::new()
            .with_project_type(ProjectType::new("web", 1000.0))
            .with_feature(Feature::new("seo", 200.0))
            .with_group(MultiplierGroup::new(
                "timeline",
                vec![MultiplierOption::new("rush", 1.5)],
            ));
        let catalog: DiscountCatalog = serde_json::from_str(
            r#"{"discounts": [{"code": "TEN", "discountType": "percent", "amount": 10}]}"#,
        )
        .unwrap();
        Quote::prepare(
            &model,
            PricingInputs::new("web").with_feature("seo"),
            &catalog,
            code,
            Utc::now(),
            &EstimateOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_report_lists_items() {
        let quote = quote(Some("TEN"));
        let report = quote_report(&quote, &quote.breakdown);

        assert!(report.contains("Features (seo)"));
        assert!(report.contains("timeline=rush ×1.5"));
        assert!(report.contains("$1,800.00"));
        assert!(report.contains("Discount (TEN)"));
        assert!(report.contains("-$180.00"));
        assert!(report.contains("$1,620.00"));
        assert!(!report.contains("⚠️"));
    }

    #[test]
    fn test_report_shows_discount_notice() {
        let quote = quote(Some("MISSING"));
        let report = quote_report(&quote, &quote.breakdown);
        assert!(report.contains("Discount code not found"));
        assert!(!report.contains("Discount (MISSING)"));
    }
}
