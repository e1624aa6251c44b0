//! Measurement units and quantity/cost conversion
//!
//! Purchases and recipe rows are measured in one of six units. Only the
//! kg/gram and lts/ml pairs are related; mt (meter) and no (piece count)
//! never convert to anything else, so conversions between unrelated units
//! pass the value through unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A purchase or recipe measurement unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Gram,
    Lts,
    Ml,
    Mt,
    No,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Gram => "gram",
            Unit::Lts => "lts",
            Unit::Ml => "ml",
            Unit::Mt => "mt",
            Unit::No => "no",
        }
    }

    /// All selectable units, in the order forms present them
    pub fn all() -> [Unit; 6] {
        [Unit::Kg, Unit::Gram, Unit::Lts, Unit::Ml, Unit::Mt, Unit::No]
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown unit label
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown unit: {0}")]
pub struct ParseUnitError(pub String);

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Unit::Kg),
            "gram" => Ok(Unit::Gram),
            "lts" => Ok(Unit::Lts),
            "ml" => Ok(Unit::Ml),
            "mt" => Ok(Unit::Mt),
            "no" => Ok(Unit::No),
            other => Err(ParseUnitError(other.to_string())),
        }
    }
}

const SCALE: Decimal = Decimal::ONE_THOUSAND;

/// Convert a quantity between units.
///
/// Supported pairs are kg<->gram and lts<->ml (factor 1000). Every other
/// pair, including a unit to itself, passes the value through unchanged.
pub fn convert(value: Decimal, from: Unit, to: Unit) -> Decimal {
    match (from, to) {
        (Unit::Kg, Unit::Gram) | (Unit::Lts, Unit::Ml) => value * SCALE,
        (Unit::Gram, Unit::Kg) | (Unit::Ml, Unit::Lts) => value / SCALE,
        _ => value,
    }
}

/// Convert a per-unit cost between units.
///
/// A price per kg becomes a price per gram by dividing, the inverse of the
/// quantity conversion. Unrelated pairs pass through unchanged.
pub fn convert_unit_cost(cost: Decimal, from: Unit, to: Unit) -> Decimal {
    match (from, to) {
        (Unit::Kg, Unit::Gram) | (Unit::Lts, Unit::Ml) => cost / SCALE,
        (Unit::Gram, Unit::Kg) | (Unit::Ml, Unit::Lts) => cost * SCALE,
        _ => cost,
    }
}
