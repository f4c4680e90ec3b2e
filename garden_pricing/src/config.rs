//! Engine and server configuration.
//!
//! Pricing tables are loaded from a JSON file.  Every field has a
//! default, so a partial file only overrides what it names and a
//! missing file yields the published rates.  Server settings come from
//! environment variables.

use crate::credits::CreditsPolicy;
use crate::duration::{default_tiers, DurationTier};
use crate::food::FoodPolicy;
use crate::seasons::SeasonTableConfig;
use crate::vat::DEFAULT_VAT_RATE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "GARDEN_PRICING_CONFIG";
pub const BIND_ADDR_VAR: &str = "GARDEN_BIND_ADDR";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub vat_rate: f64,
    pub duration_discounts: Vec<DurationTier>,
    pub seasons: SeasonTableConfig,
    pub food: FoodPolicy,
    pub credits: CreditsPolicy,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            duration_discounts: default_tiers(),
            seasons: SeasonTableConfig::default(),
            food: FoodPolicy::default(),
            credits: CreditsPolicy::default(),
        }
    }
}

impl PricingConfig {
    /// Load pricing configuration from `path`.  A missing file is not
    /// an error; the defaults are used instead.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "pricing config not found, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading pricing config {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("parsing pricing config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded pricing config");
        Ok(config)
    }
}

/// Where the server binds and where it reads its pricing tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub config_path: PathBuf,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            config_path: PathBuf::from(
                std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config/pricing.json".to_string()),
            ),
        }
    }
}
