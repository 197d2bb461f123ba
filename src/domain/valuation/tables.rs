//! Multiplier tables and the confidence-derived price spread
//!
//! The tables are configuration data, loaded once and validated for
//! monotonicity before the engine serves; a request never sees them change.

use serde::{Deserialize, Serialize};

use super::entity::{ConditionGrade, Provenance};
use crate::domain::catalog::RarityTier;
use crate::domain::DomainError;

/// Round a currency amount to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rarity multipliers in ascending tier order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityMultipliers {
    pub mass: f64,
    pub legacy: f64,
    pub collector: f64,
    pub rare: f64,
    pub prototype: f64,
}

impl Default for RarityMultipliers {
    fn default() -> Self {
        Self {
            mass: 1.0,
            legacy: 1.5,
            collector: 2.0,
            rare: 3.0,
            prototype: 4.5,
        }
    }
}

/// Condition multipliers in ascending grade order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionMultipliers {
    pub poor: f64,
    pub fair: f64,
    pub good: f64,
    pub excellent: f64,
    pub mint: f64,
}

impl Default for ConditionMultipliers {
    fn default() -> Self {
        Self {
            poor: 0.5,
            fair: 0.8,
            good: 1.0,
            excellent: 1.5,
            mint: 2.0,
        }
    }
}

/// Provenance multipliers, each at least 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceMultipliers {
    pub none: f64,
    pub team_issued: f64,
    pub player_issued: f64,
    pub certificate_of_authenticity: f64,
}

impl Default for ProvenanceMultipliers {
    fn default() -> Self {
        Self {
            none: 1.0,
            team_issued: 1.15,
            player_issued: 1.3,
            certificate_of_authenticity: 1.5,
        }
    }
}

/// The full valuation rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationTables {
    pub rarity: RarityMultipliers,
    pub condition: ConditionMultipliers,
    pub provenance: ProvenanceMultipliers,
    /// Minimum half-width of the price range as a fraction of the estimate
    pub base_spread: f64,
    /// Additional spread applied in proportion to (1 - confidence)
    pub confidence_spread: f64,
}

impl Default for ValuationTables {
    fn default() -> Self {
        Self {
            rarity: RarityMultipliers::default(),
            condition: ConditionMultipliers::default(),
            provenance: ProvenanceMultipliers::default(),
            base_spread: 0.05,
            confidence_spread: 0.25,
        }
    }
}

impl ValuationTables {
    /// Validate monotonicity and bounds.
    ///
    /// Rarity must be strictly increasing across tiers, condition strictly
    /// increasing across grades, every provenance multiplier >= 1.0, and
    /// both spread factors non-negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        let rarity: Vec<f64> = RarityTier::ALL
            .iter()
            .map(|t| self.rarity_multiplier(*t))
            .collect();
        if rarity.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DomainError::configuration(
                "rarity multipliers must strictly increase from mass to prototype",
            ));
        }

        let condition: Vec<f64> = ConditionGrade::ALL
            .iter()
            .map(|g| self.condition_multiplier(*g))
            .collect();
        if condition.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DomainError::configuration(
                "condition multipliers must strictly increase from poor to mint",
            ));
        }

        if Provenance::ALL
            .iter()
            .any(|p| self.provenance_multiplier(*p) < 1.0)
        {
            return Err(DomainError::configuration(
                "provenance multipliers must all be at least 1.0",
            ));
        }

        if self.base_spread < 0.0 || self.confidence_spread < 0.0 {
            return Err(DomainError::configuration(
                "spread factors must be non-negative",
            ));
        }

        Ok(())
    }

    pub fn rarity_multiplier(&self, tier: RarityTier) -> f64 {
        match tier {
            RarityTier::Mass => self.rarity.mass,
            RarityTier::Legacy => self.rarity.legacy,
            RarityTier::Collector => self.rarity.collector,
            RarityTier::Rare => self.rarity.rare,
            RarityTier::Prototype => self.rarity.prototype,
        }
    }

    pub fn condition_multiplier(&self, grade: ConditionGrade) -> f64 {
        match grade {
            ConditionGrade::Poor => self.condition.poor,
            ConditionGrade::Fair => self.condition.fair,
            ConditionGrade::Good => self.condition.good,
            ConditionGrade::Excellent => self.condition.excellent,
            ConditionGrade::Mint => self.condition.mint,
        }
    }

    pub fn provenance_multiplier(&self, provenance: Provenance) -> f64 {
        match provenance {
            Provenance::None => self.provenance.none,
            Provenance::TeamIssued => self.provenance.team_issued,
            Provenance::PlayerIssued => self.provenance.player_issued,
            Provenance::CertificateOfAuthenticity => {
                self.provenance.certificate_of_authenticity
            }
        }
    }

    /// Half-width of the price range as a fraction of the estimate.
    ///
    /// Lower confidence widens the interval.
    pub fn spread_factor(&self, confidence: f64) -> f64 {
        self.base_spread + (1.0 - confidence.clamp(0.0, 1.0)) * self.confidence_spread
    }
}
