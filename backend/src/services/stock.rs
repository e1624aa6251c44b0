//! Stock sufficiency check and deduction
//!
//! Deduction never appends to the ledger: it lowers the `stock` field of
//! the latest purchase record for each material, in place. The sufficiency
//! check runs over every row first; the deduction writes themselves are
//! independent per row and a failed row is logged and skipped.

use futures_util::future::join_all;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use shared::models::{PricingRow, PurchaseRecord};
use shared::units::{convert, Unit};

use crate::error::AppResult;
use crate::services::ledger;
use crate::store::{CollectionPath, DocumentStore};

/// Insufficiency messages for every ingredient row that cannot be covered
/// by current stock.
///
/// Stock and requirement are normalized through the kg->gram factor; rows
/// and records in lts/ml/mt/no are compared as stored, since cross-family
/// comparison is not defined. Messages quote both amounts in their
/// original units.
pub fn check(rows: &[PricingRow], purchases: &[PurchaseRecord]) -> Vec<String> {
    let mut errors = Vec::new();

    for row in rows {
        let PricingRow::Ingredient {
            material_id,
            quantity,
            unit,
        } = row
        else {
            continue;
        };

        let Some(material) = purchases.iter().find(|r| r.id == *material_id) else {
            errors.push(
                "Insufficient stock for a material in the list. Please check your selections."
                    .to_string(),
            );
            continue;
        };

        let Some(latest) = ledger::latest_for(purchases, &material.material) else {
            errors.push(format!(
                "Insufficient stock for {}: Material not found.",
                material.material
            ));
            continue;
        };

        let available = convert(latest.stock, latest.quantity_unit, Unit::Gram);
        let required = convert(*quantity, *unit, Unit::Gram);

        if available < required {
            errors.push(format!(
                "Insufficient stock for {}. Required: {:.2} {}, Available: {:.2} {}.",
                latest.material, quantity, unit, latest.stock, latest.quantity_unit
            ));
        }
    }

    errors
}

/// One planned in-place stock write
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionWrite {
    pub record_id: Uuid,
    pub material: String,
    pub new_stock: Decimal,
}

/// Plan the deduction for one row against the current ledger.
///
/// The row quantity is converted into the latest record's unit and the new
/// stock clamps at zero. Rows whose material cannot be resolved plan
/// nothing.
pub fn plan_deduction(row: &PricingRow, purchases: &[PurchaseRecord]) -> Option<DeductionWrite> {
    let PricingRow::Ingredient {
        material_id,
        quantity,
        unit,
    } = row
    else {
        return None;
    };

    let material = purchases.iter().find(|r| r.id == *material_id)?;
    let latest = ledger::latest_for(purchases, &material.material)?;

    let deduction = convert(*quantity, *unit, latest.quantity_unit);
    let new_stock = (latest.stock - deduction).max(Decimal::ZERO);

    Some(DeductionWrite {
        record_id: latest.id,
        material: latest.material.clone(),
        new_stock,
    })
}

/// Stock deduction service
#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn DocumentStore>,
    app_id: String,
}

impl StockService {
    pub fn new(store: Arc<dyn DocumentStore>, app_id: String) -> Self {
        Self { store, app_id }
    }

    fn path(&self, uid: &str) -> CollectionPath {
        CollectionPath::materials(&self.app_id, uid)
    }

    async fn load(&self, uid: &str) -> AppResult<Vec<PurchaseRecord>> {
        let documents = self.store.get_all(&self.path(uid)).await?;
        let mut purchases = Vec::with_capacity(documents.len());
        for document in &documents {
            purchases.push(document.deserialize::<PurchaseRecord>()?);
        }
        Ok(purchases)
    }

    /// Check every ingredient row against current stock
    pub async fn check_stock(&self, uid: &str, rows: &[PricingRow]) -> AppResult<Vec<String>> {
        let purchases = self.load(uid).await?;
        Ok(check(rows, &purchases))
    }

    /// Apply the deduction for every ingredient row.
    ///
    /// Writes are issued concurrently and are independent: a row whose
    /// record lookup or write fails is logged and skipped, the rest still
    /// land. Completes only once every write has resolved.
    pub async fn deduct(&self, uid: &str, rows: &[PricingRow]) -> AppResult<()> {
        let purchases = self.load(uid).await?;
        let path = self.path(uid);

        let mut writes = Vec::new();
        for row in rows {
            if let PricingRow::Ingredient { material_id, .. } = row {
                match plan_deduction(row, &purchases) {
                    Some(write) => writes.push(write),
                    None => {
                        tracing::warn!(
                            material_id = %material_id,
                            "stock deduction skipped: no recent record found"
                        );
                    }
                }
            }
        }

        let results = join_all(writes.into_iter().map(|write| {
            let store = self.store.clone();
            let path = path.clone();
            async move {
                store
                    .update(&path, write.record_id, json!({ "stock": write.new_stock }))
                    .await
                    .map_err(|err| (write.material, err))
            }
        }))
        .await;

        for result in results {
            if let Err((material, err)) = result {
                tracing::warn!(material = %material, error = %err, "stock deduction failed");
            }
        }

        Ok(())
    }
}
