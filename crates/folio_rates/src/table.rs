//! Exchange rate tables.

use std::collections::HashMap;

use folio_pricing::Currency;
use serde::{Deserialize, Serialize};

use crate::error::{RatesError, RatesResult};

/// Units of each currency per one unit of `base`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub base: Currency,
    #[serde(default)]
    pub rates: HashMap<Currency, f64>,
}

impl RateTable {
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: Currency, rate: f64) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    /// Rate for a currency relative to the base.
    pub fn rate(&self, currency: Currency) -> RatesResult<f64> {
        if currency == self.base {
            return Ok(1.0);
        }
        let rate = *self
            .rates
            .get(&currency)
            .ok_or(RatesError::MissingRate(currency))?;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(RatesError::InvalidRate { currency, rate });
        }
        Ok(rate)
    }

    /// Multiplier that turns an amount in `from` into `to`.
    pub fn factor(&self, from: Currency, to: Currency) -> RatesResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        Ok(self.rate(to)? / self.rate(from)?)
    }

    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> RatesResult<f64> {
        Ok(amount * self.factor(from, to)?)
    }

    /// Express the same rates relative to another base currency.
    ///
    /// Fails when the table has no usable rate for the new base. Currencies
    /// missing from the table stay missing.
    pub fn rebased(&self, base: Currency) -> RatesResult<Self> {
        if base == self.base {
            return Ok(self.clone());
        }
        let base_rate = self.rate(base)?;
        let mut table = RateTable::new(base);
        for currency in Currency::ALL {
            if currency == base {
                continue;
            }
            match self.rate(currency) {
                Ok(rate) => {
                    table.rates.insert(currency, rate / base_rate);
                }
                Err(RatesError::MissingRate(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(table)
    }
}
