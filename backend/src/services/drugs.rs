//! Drug purchase log service
//!
//! A flat log: entries are appended, listed, searched, and deleted. No
//! stock or cost projection is maintained over drug purchases.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use shared::models::DrugRecord;
use shared::units::Unit;

use crate::error::{AppError, AppResult};
use crate::store::{document_body, CollectionPath, DocumentStore};

/// Input for one drug purchase entry
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DrugEntry {
    #[validate(length(min = 1, message = "Drug name is required"))]
    pub drug_name: String,
    pub quantity: Decimal,
    pub quantity_unit: Unit,
    pub price_per_unit: Decimal,
    /// Total price; computed from quantity when absent
    pub price: Option<Decimal>,
    pub preparation: Option<String>,
    /// Free-form extra fields from the entry form
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Drug log service
#[derive(Clone)]
pub struct DrugService {
    store: Arc<dyn DocumentStore>,
    app_id: String,
}

impl DrugService {
    pub fn new(store: Arc<dyn DocumentStore>, app_id: String) -> Self {
        Self { store, app_id }
    }

    fn path(&self, uid: &str) -> CollectionPath {
        CollectionPath::drugs(&self.app_id, uid)
    }

    async fn load(&self, uid: &str) -> AppResult<Vec<DrugRecord>> {
        let documents = self.store.get_all(&self.path(uid)).await?;
        let mut records = Vec::with_capacity(documents.len());
        for document in &documents {
            records.push(document.deserialize::<DrugRecord>()?);
        }
        Ok(records)
    }

    /// Append one drug purchase to the log
    pub async fn add_entry(&self, uid: &str, entry: DrugEntry) -> AppResult<DrugRecord> {
        entry
            .validate()
            .map_err(|err| AppError::ValidationError(err.to_string()))?;

        let record = DrugRecord {
            id: Uuid::nil(),
            price: entry.price.unwrap_or(entry.quantity * entry.price_per_unit),
            drug_name: entry.drug_name,
            quantity: entry.quantity,
            quantity_unit: entry.quantity_unit,
            price_per_unit: entry.price_per_unit,
            preparation: entry.preparation,
            extra: entry.extra,
            timestamp: Utc::now(),
        };

        let id = self
            .store
            .add(&self.path(uid), document_body(&record)?)
            .await?;

        Ok(DrugRecord { id, ..record })
    }

    /// Every entry, sorted by drug name for display
    pub async fn list(&self, uid: &str) -> AppResult<Vec<DrugRecord>> {
        let mut records = self.load(uid).await?;
        records.sort_by(|a, b| {
            a.drug_name
                .to_lowercase()
                .cmp(&b.drug_name.to_lowercase())
        });
        Ok(records)
    }

    /// Entries whose name contains the term, case-insensitive
    pub async fn search(&self, uid: &str, term: &str) -> AppResult<Vec<DrugRecord>> {
        let needle = term.trim().to_lowercase();
        let mut records = self.load(uid).await?;
        records.retain(|r| r.drug_name.to_lowercase().contains(&needle));
        records.sort_by(|a, b| {
            a.drug_name
                .to_lowercase()
                .cmp(&b.drug_name.to_lowercase())
        });
        Ok(records)
    }

    /// Purchase history of one drug by exact name, newest first
    pub async fn history(&self, uid: &str, drug_name: &str) -> AppResult<Vec<DrugRecord>> {
        let mut records = self.load(uid).await?;
        records.retain(|r| r.drug_name == drug_name);
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Delete one entry
    pub async fn delete_entry(&self, uid: &str, id: Uuid) -> AppResult<()> {
        self.store.delete(&self.path(uid), id).await?;
        Ok(())
    }
}
