//! Shop configuration loading from shop.toml
//!
//! Optional operator overrides: per-item price changes and the currency band
//! used when a chest cannot resolve to an item. The file is optional; missing
//! file means builtin defaults.

use crate::core::rewards::FallbackBand;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire shop.toml file
#[derive(Debug, Default, Deserialize)]
pub struct ShopConfig {
    /// Currency band for chest fallback grants
    #[serde(default)]
    pub chest_fallback: Option<ChestFallback>,
    /// Per-item price overrides
    #[serde(default)]
    pub price_overrides: Vec<PriceOverride>,
}

/// Currency band for chest fallback grants
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChestFallback {
    /// Minimum fallback amount
    pub min: i64,
    /// Maximum fallback amount
    pub max: i64,
}

/// One per-item price override
#[derive(Debug, Clone, Deserialize)]
pub struct PriceOverride {
    /// Catalog item id
    pub id: String,
    /// New price
    pub price: i64,
}

impl ShopConfig {
    /// The fallback band to use, defaulting when the file omits it.
    #[must_use]
    pub fn fallback_band(&self) -> FallbackBand {
        self.chest_fallback.map_or_else(FallbackBand::default, |band| FallbackBand {
            min: band.min,
            max: band.max,
        })
    }

    /// Override pairs in the shape the catalog expects.
    #[must_use]
    pub fn override_pairs(&self) -> Vec<(String, i64)> {
        self.price_overrides
            .iter()
            .map(|o| (o.id.clone(), o.price))
            .collect()
    }
}

/// Loads shop configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ShopConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read shop config: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse shop.toml: {e}"),
    })
}

/// Loads shop configuration from the default location (./shop.toml),
/// returning defaults when the file does not exist.
pub fn load_default_config() -> Result<ShopConfig> {
    if Path::new("shop.toml").exists() {
        load_config("shop.toml")
    } else {
        Ok(ShopConfig::default())
    }
}
