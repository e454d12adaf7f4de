//! Where exchange rates come from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_pricing::Currency;
use tracing::debug;

use crate::error::{RatesError, RatesResult};
use crate::table::RateTable;

/// A provider of exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the current rates relative to `base`.
    async fn fetch(&self, base: Currency) -> RatesResult<RateTable>;
}

/// Rates fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    table: RateTable,
}

impl StaticRateSource {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, base: Currency) -> RatesResult<RateTable> {
        self.table.rebased(base)
    }
}

/// Rates read from a YAML or JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileRateSource {
    path: PathBuf,
}

impl FileRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> RatesResult<RateTable> {
        let ext = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
            "json" => Ok(serde_json::from_str(content)?),
            _ => Err(RatesError::UnsupportedFormat(self.path.clone())),
        }
    }
}

#[async_trait]
impl RateSource for FileRateSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, base: Currency) -> RatesResult<RateTable> {
        debug!("Reading exchange rates from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        self.parse(&content)?.rebased(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_rebases() {
        let source = StaticRateSource::new(RateTable::new(Currency::USD).with_rate(Currency::EUR, 0.5));
        let table = source.fetch(Currency::EUR).await.unwrap();
        assert_eq!(table.base, Currency::EUR);
        assert_eq!(table.rate(Currency::USD).unwrap(), 2.0);
    }

    #[test]
    fn test_file_source_rejects_unknown_extension() {
        let source = FileRateSource::new("rates.csv");
        assert!(source.parse("USD,1").is_err());
    }
}
