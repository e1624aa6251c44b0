//! Purchase entry service
//!
//! Reconciles a new purchase entry against the previous latest record for
//! the same material name: total price, weighted-average cost per unit, and
//! running stock. Each of the three derived fields can be pinned manually,
//! independently of the other two.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use shared::models::{Derived, PurchaseEntry, PurchaseRecord};
use shared::units::convert;
use shared::validation::{
    validate_amount, validate_gstin, validate_material_name, validate_quantity,
};

use crate::error::{AppError, AppResult};
use crate::services::ledger;
use crate::store::{document_body, CollectionPath, DocumentStore};

/// The three derived values of one reconciled purchase
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// quantity * price_per_unit, before surcharges
    pub price: Decimal,
    /// (price + gst + hamali + transportation) / quantity; None when the
    /// quantity is zero
    pub updated_cost_per_unit: Option<Decimal>,
    /// Previous stock (unit-converted) plus this purchase's quantity
    pub stock: Decimal,
}

/// Compute the derived fields of a purchase entry.
///
/// A `Derived::Manual` value suppresses the formula for that field only;
/// the other two keep auto-computing. The first purchase of a material has
/// no previous record, so its stock starts at the purchase quantity.
pub fn reconcile(entry: &PurchaseEntry, previous: Option<&PurchaseRecord>) -> Reconciled {
    let purchase_price = entry.quantity * entry.price_per_unit;

    let price = entry.price.unwrap_or_compute(|| purchase_price);

    let total_cost = purchase_price + entry.gst + entry.hamali + entry.transportation;
    let updated_cost_per_unit = match entry.updated_cost_per_unit {
        Derived::Manual(value) => Some(value),
        Derived::Auto if entry.quantity > Decimal::ZERO => Some(total_cost / entry.quantity),
        Derived::Auto => None,
    };

    let stock = entry.stock.unwrap_or_compute(|| {
        let carried = previous
            .map(|prev| convert(prev.stock, prev.quantity_unit, entry.quantity_unit))
            .unwrap_or(Decimal::ZERO);
        carried + entry.quantity
    });

    Reconciled {
        price,
        updated_cost_per_unit,
        stock,
    }
}

fn validate_entry(entry: &PurchaseEntry) -> AppResult<()> {
    entry
        .validate()
        .map_err(|err| AppError::ValidationError(err.to_string()))?;
    validate_material_name(&entry.material).map_err(|msg| AppError::Validation {
        field: "material".to_string(),
        message: msg.to_string(),
    })?;
    validate_quantity(entry.quantity)
        .map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;
    for (field, amount) in [
        ("pricePerUnit", entry.price_per_unit),
        ("gst", entry.gst),
        ("hamali", entry.hamali),
        ("transportation", entry.transportation),
    ] {
        validate_amount(amount).map_err(|msg| AppError::Validation {
            field: field.to_string(),
            message: msg.to_string(),
        })?;
    }
    if let Some(gstin) = entry.gst_number.as_deref() {
        if !gstin.is_empty() {
            validate_gstin(gstin).map_err(|msg| AppError::Validation {
                field: "gstNumber".to_string(),
                message: msg.to_string(),
            })?;
        }
    }
    Ok(())
}

/// Material purchase service
#[derive(Clone)]
pub struct MaterialService {
    store: Arc<dyn DocumentStore>,
    app_id: String,
}

impl MaterialService {
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

    /// Record a new purchase, reconciled against the previous latest record
    /// for the same material name
    pub async fn submit_purchase(&self, uid: &str, entry: PurchaseEntry) -> AppResult<PurchaseRecord> {
        validate_entry(&entry)?;

        let purchases = self.load(uid).await?;
        let previous = ledger::latest_for(&purchases, &entry.material);
        let reconciled = reconcile(&entry, previous);

        let record = PurchaseRecord {
            id: Uuid::nil(),
            material: entry.material,
            dealer: entry.dealer,
            gst_number: entry.gst_number,
            description: entry.description,
            quantity: entry.quantity,
            quantity_unit: entry.quantity_unit,
            price_per_unit: entry.price_per_unit,
            price: reconciled.price,
            gst: entry.gst,
            hamali: entry.hamali,
            transportation: entry.transportation,
            min_quantity: entry.min_quantity,
            min_quantity_unit: entry.min_quantity_unit,
            stock: reconciled.stock,
            updated_cost_per_unit: reconciled.updated_cost_per_unit,
            categories: entry.categories,
            bill_photo_url: entry.bill_photo_url,
            timestamp: Utc::now(),
            updated_at: None,
        };

        let id = self
            .store
            .add(&self.path(uid), document_body(&record)?)
            .await?;

        Ok(PurchaseRecord { id, ..record })
    }

    /// Latest record for a material name, used to prefill the entry form.
    /// None means this is a new material.
    pub async fn prefill(&self, uid: &str, material: &str) -> AppResult<Option<PurchaseRecord>> {
        let purchases = self.load(uid).await?;
        Ok(ledger::latest_for(&purchases, material).cloned())
    }

    /// Edit an existing purchase record in place.
    ///
    /// Price and cost per unit are recomputed from the edited fields; stock
    /// keeps its stored value unless the user pinned a new one. The original
    /// timestamp is preserved so the record keeps its place in the ledger.
    pub async fn update_purchase(
        &self,
        uid: &str,
        id: Uuid,
        entry: PurchaseEntry,
    ) -> AppResult<PurchaseRecord> {
        validate_entry(&entry)?;

        let purchases = self.load(uid).await?;
        let existing = purchases
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound("Material purchase".to_string()))?;

        let stock_entry = PurchaseEntry {
            stock: match entry.stock {
                Derived::Manual(value) => Derived::Manual(value),
                Derived::Auto => Derived::Manual(existing.stock),
            },
            ..entry
        };
        let reconciled = reconcile(&stock_entry, None);

        let record = PurchaseRecord {
            id,
            material: stock_entry.material,
            dealer: stock_entry.dealer,
            gst_number: stock_entry.gst_number,
            description: stock_entry.description,
            quantity: stock_entry.quantity,
            quantity_unit: stock_entry.quantity_unit,
            price_per_unit: stock_entry.price_per_unit,
            price: reconciled.price,
            gst: stock_entry.gst,
            hamali: stock_entry.hamali,
            transportation: stock_entry.transportation,
            min_quantity: stock_entry.min_quantity,
            min_quantity_unit: stock_entry.min_quantity_unit,
            stock: reconciled.stock,
            updated_cost_per_unit: reconciled.updated_cost_per_unit,
            categories: stock_entry.categories,
            bill_photo_url: stock_entry.bill_photo_url,
            timestamp: existing.timestamp,
            updated_at: Some(Utc::now()),
        };

        self.store
            .update(&self.path(uid), id, document_body(&record)?)
            .await?;

        Ok(record)
    }

    /// Delete a purchase record
    pub async fn delete_purchase(&self, uid: &str, id: Uuid) -> AppResult<()> {
        self.store.delete(&self.path(uid), id).await?;
        Ok(())
    }

    /// Every purchase for this user, newest first
    pub async fn list_purchases(&self, uid: &str) -> AppResult<Vec<PurchaseRecord>> {
        let mut purchases = self.load(uid).await?;
        purchases.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(purchases)
    }
}
