//! Material ledger projection service
//!
//! The purchase log is append-only; current inventory state is a projection
//! over it. For each distinct material name the chronologically-latest
//! purchase record is the authoritative snapshot of running stock and
//! weighted-average cost.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use shared::models::PurchaseRecord;

use crate::error::AppResult;
use crate::store::{CollectionPath, DocumentStore};

/// Latest record per material name, by maximum timestamp.
///
/// Equal timestamps resolve to the later entry in the slice, which keeps a
/// single projection call deterministic.
pub fn project(purchases: &[PurchaseRecord]) -> HashMap<String, PurchaseRecord> {
    let mut latest: HashMap<String, &PurchaseRecord> = HashMap::new();
    for record in purchases {
        let newer = match latest.get(&record.material) {
            Some(current) => record.timestamp >= current.timestamp,
            None => true,
        };
        if newer {
            latest.insert(record.material.clone(), record);
        }
    }
    latest
        .into_iter()
        .map(|(name, record)| (name, record.clone()))
        .collect()
}

/// The latest purchase record for one material name
pub fn latest_for<'a>(
    purchases: &'a [PurchaseRecord],
    material: &str,
) -> Option<&'a PurchaseRecord> {
    let mut found: Option<&PurchaseRecord> = None;
    for record in purchases.iter().filter(|r| r.material == material) {
        let newer = match found {
            Some(current) => record.timestamp >= current.timestamp,
            None => true,
        };
        if newer {
            found = Some(record);
        }
    }
    found
}

/// Full purchase history for one material, newest first.
///
/// Matching is exact and case-sensitive; the descending sort is a display
/// concern.
pub fn history(purchases: &[PurchaseRecord], material: &str) -> Vec<PurchaseRecord> {
    let mut records: Vec<PurchaseRecord> = purchases
        .iter()
        .filter(|r| r.material == material)
        .cloned()
        .collect();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

/// Every distinct category label across the purchase log, sorted
pub fn categories(purchases: &[PurchaseRecord]) -> Vec<String> {
    let set: BTreeSet<&String> = purchases.iter().flat_map(|r| &r.categories).collect();
    set.into_iter().cloned().collect()
}

/// Ledger service reading the materials collection through the store
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn DocumentStore>,
    app_id: String,
}

impl LedgerService {
    pub fn new(store: Arc<dyn DocumentStore>, app_id: String) -> Self {
        Self { store, app_id }
    }

    /// Every purchase record for this user, in insertion order
    pub async fn all_purchases(&self, uid: &str) -> AppResult<Vec<PurchaseRecord>> {
        let path = CollectionPath::materials(&self.app_id, uid);
        let documents = self.store.get_all(&path).await?;
        let mut purchases = Vec::with_capacity(documents.len());
        for document in &documents {
            purchases.push(document.deserialize::<PurchaseRecord>()?);
        }
        Ok(purchases)
    }

    /// Latest snapshot per material name
    pub async fn latest_snapshots(&self, uid: &str) -> AppResult<HashMap<String, PurchaseRecord>> {
        let purchases = self.all_purchases(uid).await?;
        Ok(project(&purchases))
    }

    /// Purchase history of one material, newest first
    pub async fn material_history(
        &self,
        uid: &str,
        material: &str,
    ) -> AppResult<Vec<PurchaseRecord>> {
        let purchases = self.all_purchases(uid).await?;
        Ok(history(&purchases, material))
    }

    /// Materials whose current stock is below the reorder threshold,
    /// sorted by name for the reorder (indent) list
    pub async fn low_stock(&self, uid: &str) -> AppResult<Vec<PurchaseRecord>> {
        let snapshots = self.latest_snapshots(uid).await?;
        let mut low: Vec<PurchaseRecord> = snapshots
            .into_values()
            .filter(PurchaseRecord::is_low_stock)
            .collect();
        low.sort_by(|a, b| a.material.to_lowercase().cmp(&b.material.to_lowercase()));
        Ok(low)
    }

    /// Distinct category labels across the whole purchase log
    pub async fn categories(&self, uid: &str) -> AppResult<Vec<String>> {
        let purchases = self.all_purchases(uid).await?;
        Ok(categories(&purchases))
    }
}
