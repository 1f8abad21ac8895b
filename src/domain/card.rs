use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Discover,
    AmericanExpress,
    #[serde(other)]
    Unknown,
}

impl CardBrand {
    /// Parses a brand name as it appears in merchant configuration.
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" => Some(Self::Mastercard),
            "discover" => Some(Self::Discover),
            "american_express" => Some(Self::AmericanExpress),
            _ => None,
        }
    }
}

/// Card brands the merchant accepts. Unrecognised names are dropped.
pub fn accepted_brands<I, S>(names: I) -> BTreeSet<CardBrand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| CardBrand::from_config_name(name.as_ref()))
        .collect()
}

/// A card provisioned in the wallet, as described by the platform.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CardDescriptor {
    pub brand: CardBrand,
    #[serde(default)]
    pub card_id: Option<String>,
}

impl CardDescriptor {
    pub fn new(brand: CardBrand) -> Self {
        Self {
            brand,
            card_id: None,
        }
    }
}
