//! Finished-product pricing models
//!
//! A saved product price is a point-in-time snapshot: the per-row costs are
//! copied out of the material ledger at calculation time and never follow
//! later cost changes. Deleting a saved record does not reverse the stock
//! deduction that happened when it was saved.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::Unit;

/// One row of a bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PricingRow {
    /// Raw material drawn from the purchase ledger
    #[serde(rename_all = "camelCase")]
    Ingredient {
        material_id: Uuid,
        quantity: Decimal,
        unit: Unit,
    },
    /// Packaging bottle priced from the fixed bottle catalog
    #[serde(rename_all = "camelCase")]
    Bottle { bottle_id: String, quantity: Decimal },
}

/// Point-in-time copy of one priced ingredient row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsed {
    pub material_id: Uuid,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: Unit,
    /// Ledger cost converted to the row's unit at calculation time
    pub cost_per_unit: Decimal,
    pub total_cost: Decimal,
}

/// Packaging cost summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleInfo {
    pub num_bottles: u32,
    pub cost_per_bottle: Decimal,
    pub total_bottle_cost: Decimal,
}

/// Margin-stacked price breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Ingredient cost plus bottle cost, pre-margin
    pub base_cost: Decimal,
    /// base_cost * 1.13
    pub margin1: Decimal,
    /// (base_cost + margin1) * 0.12
    pub margin2: Decimal,
    pub total_selling_price: Decimal,
    pub gross_per_bottle: Decimal,
}

/// A saved product price calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPriceRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub materials_used: Vec<MaterialUsed>,
    pub bottle_info: BottleInfo,
    pub calculations: PriceBreakdown,
    pub timestamp: DateTime<Utc>,
}

/// Result of one pricing calculation, saved or not
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub materials_used: Vec<MaterialUsed>,
    pub ingredient_cost: Decimal,
    pub bottle_info: BottleInfo,
    pub calculations: PriceBreakdown,
}
