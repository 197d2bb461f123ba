//! Catalog domain entities

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::DomainError;

// ============================================================================
// RarityTier
// ============================================================================

/// Discrete scarcity classification of a catalog entry.
///
/// Variants are declared in ascending scarcity; the valuation tables must
/// assign strictly increasing multipliers in this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RarityTier {
    #[default]
    Mass,
    Legacy,
    Collector,
    Rare,
    Prototype,
}

impl RarityTier {
    /// All tiers in ascending scarcity order
    pub const ALL: [RarityTier; 5] = [
        Self::Mass,
        Self::Legacy,
        Self::Collector,
        Self::Rare,
        Self::Prototype,
    ];
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mass => write!(f, "mass"),
            Self::Legacy => write!(f, "legacy"),
            Self::Collector => write!(f, "collector"),
            Self::Rare => write!(f, "rare"),
            Self::Prototype => write!(f, "prototype"),
        }
    }
}

// ============================================================================
// CatalogKey
// ============================================================================

/// Brand + model pair identifying a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogKey {
    brand: String,
    model: String,
}

impl CatalogKey {
    /// Create a key with validation
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Result<Self, DomainError> {
        let brand = brand.into();
        let model = model.into();
        if brand.trim().is_empty() {
            return Err(DomainError::validation("catalog brand cannot be empty"));
        }
        if model.trim().is_empty() {
            return Err(DomainError::validation("catalog model cannot be empty"));
        }
        Ok(Self { brand, model })
    }

    /// Split a predicted class label into a catalog key.
    ///
    /// Labels are curated as `"<Brand> <Model...>"`; the first whitespace
    /// separates the brand from the model name.
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        match label.trim().split_once(char::is_whitespace) {
            Some((brand, model)) => Self::new(brand, model.trim()),
            None => Err(DomainError::validation(format!(
                "class label '{}' does not contain a brand and model",
                label
            ))),
        }
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.brand, self.model)
    }
}

// ============================================================================
// CatalogEntry
// ============================================================================

/// Static reference data for one known equipment model.
///
/// Read-only at inference time; the set changes only through out-of-band
/// catalog updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    key: CatalogKey,
    base_value: f64,
    rarity_tier: RarityTier,
}

impl CatalogEntry {
    /// Create an entry with validation
    pub fn new(key: CatalogKey, base_value: f64, rarity_tier: RarityTier) -> Result<Self, DomainError> {
        if !base_value.is_finite() || base_value < 0.0 {
            return Err(DomainError::validation(format!(
                "base value for {} must be a non-negative number",
                key
            )));
        }
        Ok(Self {
            key,
            base_value,
            rarity_tier,
        })
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn brand(&self) -> &str {
        self.key.brand()
    }

    pub fn model(&self) -> &str {
        self.key.model()
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    pub fn rarity_tier(&self) -> RarityTier {
        self.rarity_tier
    }
}
