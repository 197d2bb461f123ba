//! Market valuation: grades, multiplier tables, and the valuation math

pub mod entity;
pub mod tables;

pub use entity::{ConditionGrade, Provenance, ValuationResult};
pub use tables::{round2, ValuationTables};
