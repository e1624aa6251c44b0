//! Bill-of-materials pricing service
//!
//! Builds a selling price from ingredient rows costed off the latest
//! material snapshots plus packaging cost, stacks the two fixed margins,
//! and on save freezes the calculation, checks stock, and deducts the
//! ingredients from the ledger.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use shared::models::{
    BottleInfo, MaterialUsed, PriceBreakdown, PricingResult, PricingRow, ProductPriceRecord,
    PurchaseRecord,
};
use shared::units::convert_unit_cost;
use shared::validation::{validate_bottle_count, validate_product_name};

use crate::error::{AppError, AppResult};
use crate::services::{ledger, stock::StockService};
use crate::store::{document_body, CollectionPath, DocumentStore};

/// First margin pass: 113% of base cost
const MARGIN1_RATE: Decimal = Decimal::from_parts(113, 0, 0, false, 2);
/// Second margin pass: 12% of base cost plus margin 1
const MARGIN2_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// A bottle in the fixed packaging catalog
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BottleOption {
    pub id: &'static str,
    pub label: &'static str,
    pub cost: Decimal,
}

/// Fixed bottle price table
pub fn bottle_catalog() -> Vec<BottleOption> {
    vec![
        BottleOption {
            id: "pet-100",
            label: "100 ml PET bottle",
            cost: Decimal::new(350, 2),
        },
        BottleOption {
            id: "pet-200",
            label: "200 ml PET bottle",
            cost: Decimal::new(475, 2),
        },
        BottleOption {
            id: "pet-500",
            label: "500 ml PET bottle",
            cost: Decimal::new(650, 2),
        },
        BottleOption {
            id: "glass-750",
            label: "750 ml glass bottle",
            cost: Decimal::new(1800, 2),
        },
        BottleOption {
            id: "hdpe-1000",
            label: "1 lts HDPE can",
            cost: Decimal::new(925, 2),
        },
    ]
}

fn catalog_cost(bottle_id: &str) -> Option<Decimal> {
    bottle_catalog()
        .into_iter()
        .find(|b| b.id == bottle_id)
        .map(|b| b.cost)
}

/// Input for one pricing calculation
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    #[validate(length(min = 1, message = "Please enter a product name"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rows: Vec<PricingRow>,
    /// Bottles the batch fills; per-bottle price divides by this
    pub num_bottles: u32,
    /// Manually entered per-bottle cost; catalog bottle rows add on top
    #[serde(default)]
    pub cost_per_bottle: Decimal,
}

/// Price a bill of materials against the latest material snapshots.
///
/// Ingredient costs come from each referenced material's weighted-average
/// cost, converted to the row's unit. Catalog bottle rows and the manual
/// per-bottle cost both feed the packaging side of the base cost.
pub fn price(
    rows: &[PricingRow],
    num_bottles: u32,
    cost_per_bottle: Decimal,
    latest: &HashMap<String, PurchaseRecord>,
) -> AppResult<PricingResult> {
    validate_bottle_count(num_bottles).map_err(|msg| AppError::Validation {
        field: "numBottles".to_string(),
        message: msg.to_string(),
    })?;

    let by_id: HashMap<Uuid, &PurchaseRecord> =
        latest.values().map(|record| (record.id, record)).collect();

    let mut materials_used = Vec::new();
    let mut ingredient_cost = Decimal::ZERO;
    let mut catalog_bottle_cost = Decimal::ZERO;

    for row in rows {
        match row {
            PricingRow::Ingredient {
                material_id,
                quantity,
                unit,
            } => {
                let record = by_id.get(material_id).ok_or_else(|| AppError::Validation {
                    field: "rows".to_string(),
                    message: "Please select a material for each row before calculating"
                        .to_string(),
                })?;
                let ledger_cost = record.updated_cost_per_unit.unwrap_or(Decimal::ZERO);
                let cost_per_unit =
                    convert_unit_cost(ledger_cost, record.quantity_unit, *unit);
                let total_cost = *quantity * cost_per_unit;
                ingredient_cost += total_cost;
                materials_used.push(MaterialUsed {
                    material_id: record.id,
                    material_name: record.material.clone(),
                    quantity: *quantity,
                    unit: *unit,
                    cost_per_unit,
                    total_cost,
                });
            }
            PricingRow::Bottle {
                bottle_id,
                quantity,
            } => {
                let cost = catalog_cost(bottle_id).ok_or_else(|| AppError::Validation {
                    field: "rows".to_string(),
                    message: format!("Unknown bottle \"{}\"", bottle_id),
                })?;
                catalog_bottle_cost += *quantity * cost;
            }
        }
    }

    let total_bottle_cost = catalog_bottle_cost + Decimal::from(num_bottles) * cost_per_bottle;
    let base_cost = ingredient_cost + total_bottle_cost;

    let margin1 = base_cost * MARGIN1_RATE;
    let margin2 = (base_cost + margin1) * MARGIN2_RATE;
    let total_selling_price = base_cost + margin1 + margin2;
    let gross_per_bottle = total_selling_price / Decimal::from(num_bottles);

    Ok(PricingResult {
        materials_used,
        ingredient_cost,
        bottle_info: BottleInfo {
            num_bottles,
            cost_per_bottle,
            total_bottle_cost,
        },
        calculations: PriceBreakdown {
            base_cost,
            margin1,
            margin2,
            total_selling_price,
            gross_per_bottle,
        },
    })
}

/// Product pricing service
#[derive(Clone)]
pub struct PricingService {
    store: Arc<dyn DocumentStore>,
    app_id: String,
}

impl PricingService {
    pub fn new(store: Arc<dyn DocumentStore>, app_id: String) -> Self {
        Self { store, app_id }
    }

    fn products_path(&self, uid: &str) -> CollectionPath {
        CollectionPath::products(&self.app_id, uid)
    }

    async fn latest_snapshots(&self, uid: &str) -> AppResult<HashMap<String, PurchaseRecord>> {
        let ledger = ledger::LedgerService::new(self.store.clone(), self.app_id.clone());
        ledger.latest_snapshots(uid).await
    }

    /// Run one pricing calculation without saving anything
    pub async fn calculate(&self, uid: &str, request: &PricingRequest) -> AppResult<PricingResult> {
        request
            .validate()
            .map_err(|err| AppError::ValidationError(err.to_string()))?;
        validate_product_name(&request.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        let latest = self.latest_snapshots(uid).await?;
        price(
            &request.rows,
            request.num_bottles,
            request.cost_per_bottle,
            &latest,
        )
    }

    /// Calculate, check stock, save the frozen record, then deduct the
    /// ingredients from the ledger.
    ///
    /// Any insufficient row aborts the whole save before anything is
    /// written. Deduction runs after the record is saved; each row's write
    /// is independent.
    pub async fn save(&self, uid: &str, request: &PricingRequest) -> AppResult<ProductPriceRecord> {
        let result = self.calculate(uid, request).await?;

        let stock = StockService::new(self.store.clone(), self.app_id.clone());
        let shortages = stock.check_stock(uid, &request.rows).await?;
        if !shortages.is_empty() {
            return Err(AppError::InsufficientStock(shortages.join(" ")));
        }

        let record = ProductPriceRecord {
            id: Uuid::nil(),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            materials_used: result.materials_used,
            bottle_info: result.bottle_info,
            calculations: result.calculations,
            timestamp: Utc::now(),
        };

        let id = self
            .store
            .add(&self.products_path(uid), document_body(&record)?)
            .await?;

        stock.deduct(uid, &request.rows).await?;

        Ok(ProductPriceRecord { id, ..record })
    }

    /// Every saved product price, newest first
    pub async fn list_products(&self, uid: &str) -> AppResult<Vec<ProductPriceRecord>> {
        let documents = self.store.get_all(&self.products_path(uid)).await?;
        let mut products = Vec::with_capacity(documents.len());
        for document in &documents {
            products.push(document.deserialize::<ProductPriceRecord>()?);
        }
        products.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(products)
    }

    /// Delete a saved product price. The stock deduction that happened at
    /// save time is not reversed.
    pub async fn delete_product(&self, uid: &str, id: Uuid) -> AppResult<()> {
        self.store.delete(&self.products_path(uid), id).await?;
        Ok(())
    }
}
