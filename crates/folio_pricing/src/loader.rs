//! Loading rate cards and discount catalogs from disk.
//!
//! The format is picked from the file extension: `.yaml`/`.yml`, `.json` or
//! `.toml`.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::discount::DiscountCatalog;
use crate::error::{PricingError, PricingResult};
use crate::model::PricingModel;

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Yaml,
    Json,
    Toml,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> PricingResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(DataFormat::Yaml),
            "json" => Ok(DataFormat::Json),
            "toml" => Ok(DataFormat::Toml),
            _ => Err(PricingError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> PricingResult<T> {
        Ok(match self {
            DataFormat::Yaml => serde_yaml::from_str(content)?,
            DataFormat::Json => serde_json::from_str(content)?,
            DataFormat::Toml => toml::from_str(content)?,
        })
    }
}

/// Reader for pricing data files.
pub struct ModelLoader;

impl ModelLoader {
    /// Read any deserializable data file.
    pub fn read<T: DeserializeOwned>(path: impl AsRef<Path>) -> PricingResult<T> {
        let path = path.as_ref();
        let format = DataFormat::from_path(path)?;
        debug!("Reading {:?} as {:?}", path, format);

        let content = fs::read_to_string(path)?;
        format.parse(&content)
    }

    /// Read a rate card.
    pub fn read_model(path: impl AsRef<Path>) -> PricingResult<PricingModel> {
        Self::read(path)
    }

    /// Read a discount catalog.
    pub fn read_catalog(path: impl AsRef<Path>) -> PricingResult<DiscountCatalog> {
        Self::read(path)
    }
}
