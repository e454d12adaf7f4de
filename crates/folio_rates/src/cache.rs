//! Exchange rate cache with a time-to-live.
//!
//! The cache is owned by whoever builds quotes; there is no process-wide
//! state. Staleness is measured against an injected [`Clock`] so tests can
//! move time forward explicitly.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use folio_pricing::Currency;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{RatesError, RatesResult};
use crate::source::RateSource;
use crate::table::RateTable;

/// Cached exchange rates and when they were fetched.
pub struct RateCache {
    base: Currency,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    table: Option<RateTable>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateCache {
    pub fn new(base: Currency, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            base,
            ttl,
            clock,
            table: None,
            fetched_at: None,
        }
    }

    /// A cache measured against wall-clock time.
    pub fn with_system_clock(base: Currency, ttl: Duration) -> Self {
        Self::new(base, ttl, Arc::new(SystemClock))
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.as_ref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// True when nothing is cached or the cached rates are older than the TTL.
    pub fn is_stale(&self) -> bool {
        match self.fetched_at {
            None => true,
            Some(at) => self.clock.now() - at >= self.ttl,
        }
    }

    /// Forget the cached rates so the next refresh fetches.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// Fetch new rates if the cached ones are stale.
    ///
    /// Returns `true` when the table was replaced. A failed fetch keeps any
    /// previously cached table in service and only errors when there is none.
    pub async fn refresh_if_stale(&mut self, source: &dyn RateSource) -> RatesResult<bool> {
        if !self.is_stale() {
            debug!("Exchange rates still fresh");
            return Ok(false);
        }

        match source.fetch(self.base).await {
            Ok(table) => {
                info!("Fetched exchange rates from {} source", source.name());
                self.table = Some(table);
                self.fetched_at = Some(self.clock.now());
                Ok(true)
            }
            Err(e) if self.table.is_some() => {
                warn!("Rate source {} failed, serving stale rates: {}", source.name(), e);
                Ok(false)
            }
            Err(e) => Err(RatesError::Fetch {
                source_name: source.name().to_string(),
                source: Box::new(e),
            }),
        }
    }

    /// Convert using the cached table.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> RatesResult<f64> {
        if from == to {
            return Ok(amount);
        }
        self.table
            .as_ref()
            .ok_or(RatesError::NoRates)?
            .convert(amount, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::source::StaticRateSource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RateSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self, base: Currency) -> RatesResult<RateTable> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(RateTable::new(base).with_rate(Currency::EUR, n as f64))
        }
    }

    #[tokio::test]
    async fn test_refresh_respects_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut cache = RateCache::new(Currency::USD, Duration::minutes(10), clock.clone());
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };

        assert!(cache.is_stale());
        assert!(cache.refresh_if_stale(&source).await.unwrap());
        assert!(!cache.refresh_if_stale(&source).await.unwrap());

        clock.advance(Duration::minutes(9));
        assert!(!cache.is_stale());

        clock.advance(Duration::minutes(1));
        assert!(cache.is_stale());
        assert!(cache.refresh_if_stale(&source).await.unwrap());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.convert(10.0, Currency::USD, Currency::EUR).unwrap(), 20.0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let source = StaticRateSource::new(RateTable::new(Currency::USD));
        let mut cache = RateCache::with_system_clock(Currency::USD, Duration::hours(1));

        cache.refresh_if_stale(&source).await.unwrap();
        assert!(!cache.is_stale());
        cache.invalidate();
        assert!(cache.is_stale());
    }

    #[test]
    fn test_convert_without_rates() {
        let cache = RateCache::with_system_clock(Currency::USD, Duration::hours(1));
        assert_eq!(cache.convert(5.0, Currency::USD, Currency::USD).unwrap(), 5.0);
        assert!(matches!(
            cache.convert(5.0, Currency::USD, Currency::EUR),
            Err(RatesError::NoRates)
        ));
    }
}
