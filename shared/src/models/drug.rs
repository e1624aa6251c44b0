//! Drug purchase log models
//!
//! Drugs are a flat purchase log: no running stock, no cost projection.
//! Entries may carry arbitrary extra label/value fields alongside the fixed
//! ones; those are kept as-is and round-tripped through the store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::units::Unit;

/// One drug purchase entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    pub id: Uuid,
    pub drug_name: String,
    pub quantity: Decimal,
    pub quantity_unit: Unit,
    /// Total purchase price
    pub price: Decimal,
    pub price_per_unit: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
    /// Free-form extra fields entered on the form
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_fields_flatten_into_the_document() {
        let mut extra = Map::new();
        extra.insert("batchNo".to_string(), Value::String("B-17".to_string()));
        let record = DrugRecord {
            id: Uuid::nil(),
            drug_name: "Ashwagandha".to_string(),
            quantity: Decimal::from(2),
            quantity_unit: Unit::Kg,
            price: Decimal::from(900),
            price_per_unit: Decimal::from(450),
            preparation: Some("churna".to_string()),
            extra,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["batchNo"], "B-17");
        assert_eq!(json["drugName"], "Ashwagandha");

        let back: DrugRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.extra["batchNo"], "B-17");
    }
}
