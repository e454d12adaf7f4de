//! Presentation helpers: conversion, rounding and formatting of amounts.

use folio_pricing::{Currency, EstimateBreakdown};

use crate::error::RatesResult;
use crate::table::RateTable;

/// Round to the currency's minor unit, half away from zero.
pub fn round_minor(amount: f64, currency: Currency) -> f64 {
    let scale = 10f64.powi(currency.minor_units() as i32);
    (amount * scale).round() / scale
}

/// Format an amount as `$1,234.50`.
pub fn format_money(amount: f64, currency: Currency) -> String {
    let rounded = round_minor(amount, currency);
    let decimals = currency.minor_units() as usize;
    let fixed = format!("{:.*}", decimals, rounded.abs());

    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}{}{}.{}", sign, currency, grouped, fraction),
        None => format!("{}{}{}", sign, currency, grouped),
    }
}

/// Re-express every money field of a breakdown in another currency.
///
/// The multiplier and resolved options are unit-free and carried over as-is.
pub fn convert_breakdown(
    breakdown: &EstimateBreakdown,
    table: &RateTable,
    to: Currency,
) -> RatesResult<EstimateBreakdown> {
    let factor = table.factor(breakdown.currency, to)?;
    Ok(EstimateBreakdown {
        currency: to,
        base_cost: breakdown.base_cost * factor,
        features_cost: breakdown.features_cost * factor,
        pages_cost: breakdown.pages_cost * factor,
        subtotal: breakdown.subtotal * factor,
        discount_amount: breakdown.discount_amount * factor,
        total: breakdown.total * factor,
        ..breakdown.clone()
    })
}
