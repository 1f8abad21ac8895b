//! Wallet configuration.
//!
//! Normally fetched from the gateway; the CLI reads it from a TOML file.

use crate::domain::card::{CardBrand, accepted_brands};
use crate::error::{Result, WalletError};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Partner service id registered with the wallet platform.
    pub service_id: String,

    /// Merchant id the wallet tokenizes for. Required to build a payment request.
    #[serde(default)]
    pub merchant_id: Option<String>,

    #[serde(default)]
    pub merchant_display_name: Option<String>,

    /// Brand names as the gateway reports them, e.g. `visa`, `american_express`.
    #[serde(default)]
    pub supported_card_brands: Vec<String>,

    #[serde(default = "default_integration")]
    pub integration: String,

    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_integration() -> String {
    "custom".to_string()
}

impl WalletConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks the fields every platform call depends on.
    ///
    /// Merchant identity is deliberately not checked here; a missing one is
    /// reported when a payment request is built.
    pub fn validate(&self) -> Result<()> {
        if self.service_id.trim().is_empty() {
            return Err(WalletError::Configuration(
                "service_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    pub fn accepted_brands(&self) -> BTreeSet<CardBrand> {
        accepted_brands(&self.supported_card_brands)
    }
}
