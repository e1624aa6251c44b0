//! Raw-material purchase models
//!
//! There is no standalone "material" entity. Each purchase appends a full
//! record, and the chronologically-latest record for a material name carries
//! the authoritative running stock and weighted-average cost for that
//! material. Stock deduction and explicit edits mutate that latest record in
//! place; every other path appends.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::units::Unit;

/// One purchase/restock event for a material
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: Uuid,
    /// Material display name; exact case-sensitive key into the ledger
    pub material: String,
    pub dealer: Option<String>,
    pub gst_number: Option<String>,
    pub description: Option<String>,
    /// Quantity bought in this purchase event
    pub quantity: Decimal,
    pub quantity_unit: Unit,
    /// Price per quantity_unit for this purchase
    pub price_per_unit: Decimal,
    /// quantity * price_per_unit, before surcharges
    pub price: Decimal,
    pub gst: Decimal,
    pub hamali: Decimal,
    pub transportation: Decimal,
    /// Reorder threshold
    pub min_quantity: Decimal,
    pub min_quantity_unit: Unit,
    /// Cumulative on-hand quantity after this purchase, in quantity_unit
    pub stock: Decimal,
    /// Weighted-average cost per quantity_unit after this purchase,
    /// surcharges included. None when the purchase quantity was zero.
    /// Serialized even when blank so an in-place edit can clear it under
    /// the store's merge semantics.
    pub updated_cost_per_unit: Option<Decimal>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_photo_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Set when the record is edited in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PurchaseRecord {
    /// Current stock is below the reorder threshold.
    ///
    /// The two quantities are compared as stored; the threshold is assumed
    /// to be kept in a comparable unit.
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.min_quantity
    }
}

/// A derived form field that is either auto-computed or pinned by the user.
///
/// Once the user types into a derived field it stops following the formula
/// for the rest of the entry session; the other derived fields keep
/// auto-updating independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "lowercase")]
pub enum Derived<T> {
    #[default]
    Auto,
    Manual(T),
}

impl<T> Derived<T> {
    pub fn is_manual(&self) -> bool {
        matches!(self, Derived::Manual(_))
    }

    /// The pinned value, or the result of the formula.
    pub fn unwrap_or_compute(self, compute: impl FnOnce() -> T) -> T {
        match self {
            Derived::Auto => compute(),
            Derived::Manual(value) => value,
        }
    }
}

/// Form-session input for one purchase entry
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEntry {
    #[validate(length(min = 1, message = "Material name is required"))]
    pub material: String,
    pub dealer: Option<String>,
    pub gst_number: Option<String>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub quantity_unit: Unit,
    pub price_per_unit: Decimal,
    #[serde(default)]
    pub gst: Decimal,
    #[serde(default)]
    pub hamali: Decimal,
    #[serde(default)]
    pub transportation: Decimal,
    #[serde(default)]
    pub min_quantity: Decimal,
    #[serde(default)]
    pub min_quantity_unit: Unit,
    #[serde(default)]
    pub categories: Vec<String>,
    pub bill_photo_url: Option<String>,
    /// Total purchase price; auto-computed unless the user edited it
    #[serde(default)]
    pub price: Derived<Decimal>,
    /// Weighted-average cost per unit; auto-computed unless edited
    #[serde(default)]
    pub updated_cost_per_unit: Derived<Decimal>,
    /// Running stock after this purchase; auto-computed unless edited
    #[serde(default)]
    pub stock: Derived<Decimal>,
}
