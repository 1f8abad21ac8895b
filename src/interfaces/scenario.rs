//! JSON description of a scripted wallet session, used by the CLI.

use crate::domain::card::{CardBrand, CardDescriptor};
use crate::domain::ports::{Extras, PlatformCapability, TransactionUpdateListener};
use crate::domain::sheet::{Address, Sheet, SheetUpdate};
use crate::error::Result;
use crate::infrastructure::in_memory::{PlatformScript, ScriptedPlatform};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Whether the wallet client library is present at all.
    #[serde(default = "available_by_default")]
    pub available: bool,
    #[serde(default)]
    pub platform: PlatformScript,
    #[serde(default)]
    pub listener: ScenarioListener,
}

fn available_by_default() -> bool {
    true
}

impl Scenario {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn capability(&self) -> PlatformCapability {
        if self.available {
            PlatformCapability::Available(Arc::new(ScriptedPlatform::from_script(
                self.platform.clone(),
            )))
        } else {
            PlatformCapability::Unavailable
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandUpdates {
    pub brand: CardBrand,
    pub updates: Vec<SheetUpdate>,
}

/// Answers live updates with canned sheet changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioListener {
    /// Applied when the user switches to a card of the given brand.
    #[serde(default)]
    pub card_updates: Vec<BrandUpdates>,
    /// Applied on every address change.
    #[serde(default)]
    pub address_updates: Vec<SheetUpdate>,
}

impl TransactionUpdateListener for ScenarioListener {
    fn on_card_info_updated(&mut self, card: &CardDescriptor, _sheet: &Sheet) -> Vec<SheetUpdate> {
        self.card_updates
            .iter()
            .find(|entry| entry.brand == card.brand)
            .map(|entry| entry.updates.clone())
            .unwrap_or_default()
    }

    fn on_address_updated(&mut self, _address: &Address, _sheet: &Sheet) -> Vec<SheetUpdate> {
        self.address_updates.clone()
    }

    fn on_success(&mut self, sheet: &Sheet, extras: &Extras) {
        debug!(total = ?sheet.total(), extras = extras.len(), "payment confirmed");
    }
}
