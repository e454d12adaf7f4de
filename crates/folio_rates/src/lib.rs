//! # folio_rates
//!
//! Exchange rates for displaying quotes in the visitor's currency.
//!
//! Rates live in an explicit [`RateCache`] owned by the caller, refreshed from
//! a [`RateSource`] once they are older than the configured TTL. If a refresh
//! fails the previous rates stay in service.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chrono::Duration;
//! use folio_pricing::Currency;
//! use folio_rates::{FileRateSource, RateCache, SystemClock};
//!
//! # async fn run() -> folio_rates::RatesResult<()> {
//! let source = FileRateSource::new("rates.yaml");
//! let mut cache = RateCache::new(Currency::USD, Duration::hours(1), Arc::new(SystemClock));
//! cache.refresh_if_stale(&source).await?;
//! let eur = cache.convert(6075.0, Currency::USD, Currency::EUR)?;
//! # let _ = eur;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod error;
pub mod money;
pub mod source;
pub mod table;

pub use cache::RateCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{RatesError, RatesResult};
pub use money::{convert_breakdown, format_money, round_minor};
pub use source::{FileRateSource, RateSource, StaticRateSource};
pub use table::RateTable;
