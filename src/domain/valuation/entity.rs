//! Valuation domain entities

use serde::{Deserialize, Serialize};
use std::fmt;

use super::tables::{round2, ValuationTables};
use crate::domain::catalog::CatalogEntry;
use crate::domain::DomainError;

// ============================================================================
// ConditionGrade
// ============================================================================

/// Physical condition of an item, worst to best
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ConditionGrade {
    Poor,
    Fair,
    #[default]
    Good,
    Excellent,
    Mint,
}

impl ConditionGrade {
    /// All grades in ascending order
    pub const ALL: [ConditionGrade; 5] = [
        Self::Poor,
        Self::Fair,
        Self::Good,
        Self::Excellent,
        Self::Mint,
    ];
}

impl fmt::Display for ConditionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poor => write!(f, "poor"),
            Self::Fair => write!(f, "fair"),
            Self::Good => write!(f, "good"),
            Self::Excellent => write!(f, "excellent"),
            Self::Mint => write!(f, "mint"),
        }
    }
}

impl std::str::FromStr for ConditionGrade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Ok(Self::Poor),
            "fair" => Ok(Self::Fair),
            "good" => Ok(Self::Good),
            "excellent" => Ok(Self::Excellent),
            "mint" => Ok(Self::Mint),
            other => Err(DomainError::validation(format!(
                "unknown condition grade '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Provenance
// ============================================================================

/// Documented history of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    None,
    TeamIssued,
    PlayerIssued,
    CertificateOfAuthenticity,
}

impl Provenance {
    /// All provenance kinds
    pub const ALL: [Provenance; 4] = [
        Self::None,
        Self::TeamIssued,
        Self::PlayerIssued,
        Self::CertificateOfAuthenticity,
    ];
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::TeamIssued => write!(f, "team_issued"),
            Self::PlayerIssued => write!(f, "player_issued"),
            Self::CertificateOfAuthenticity => write!(f, "certificate_of_authenticity"),
        }
    }
}

impl std::str::FromStr for Provenance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "team_issued" => Ok(Self::TeamIssued),
            "player_issued" => Ok(Self::PlayerIssued),
            "certificate_of_authenticity" => Ok(Self::CertificateOfAuthenticity),
            other => Err(DomainError::validation(format!(
                "unknown provenance '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// ValuationResult
// ============================================================================

/// The priced outcome of one identification.
///
/// Derived data: `estimated_value` is always the product of the base value
/// and the three multipliers (rounded to cents), and
/// `range_low <= estimated_value <= range_high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    brand: String,
    model: String,
    base_value: f64,
    rarity_multiplier: f64,
    condition_multiplier: f64,
    provenance_multiplier: f64,
    estimated_value: f64,
    range_low: f64,
    range_high: f64,
    confidence: f64,
}

impl ValuationResult {
    /// Price a catalog entry under the given condition, provenance, and
    /// classification confidence.
    ///
    /// Deterministic: identical inputs always produce identical output.
    pub fn compute(
        entry: &CatalogEntry,
        condition: ConditionGrade,
        provenance: Provenance,
        confidence: f64,
        tables: &ValuationTables,
    ) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DomainError::validation(format!(
                "confidence must be in [0, 1], got {}",
                confidence
            )));
        }

        let rarity_multiplier = tables.rarity_multiplier(entry.rarity_tier());
        let condition_multiplier = tables.condition_multiplier(condition);
        let provenance_multiplier = tables.provenance_multiplier(provenance);

        let estimated_value = round2(
            entry.base_value() * rarity_multiplier * condition_multiplier * provenance_multiplier,
        );

        let spread = tables.spread_factor(confidence);
        let range_low = round2((estimated_value * (1.0 - spread)).max(0.0));
        let range_high = round2(estimated_value * (1.0 + spread));

        Ok(Self {
            brand: entry.brand().to_string(),
            model: entry.model().to_string(),
            base_value: entry.base_value(),
            rarity_multiplier,
            condition_multiplier,
            provenance_multiplier,
            estimated_value,
            range_low,
            range_high,
            confidence,
        })
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    pub fn rarity_multiplier(&self) -> f64 {
        self.rarity_multiplier
    }

    pub fn condition_multiplier(&self) -> f64 {
        self.condition_multiplier
    }

    pub fn provenance_multiplier(&self) -> f64 {
        self.provenance_multiplier
    }

    pub fn estimated_value(&self) -> f64 {
        self.estimated_value
    }

    pub fn range_low(&self) -> f64 {
        self.range_low
    }

    pub fn range_high(&self) -> f64 {
        self.range_high
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
