//! Drug purchase log tests
//!
//! The drug log is flat: entries append, list, search, and delete with no
//! stock or cost projection behind them.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

use shared::units::Unit;
use stockbook_backend::error::AppError;
use stockbook_backend::services::drugs::DrugEntry;
use stockbook_backend::services::DrugService;
use stockbook_backend::store::MemoryStore;

const UID: &str = "user-1";
const APP: &str = "test-app";

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn service() -> DrugService {
    DrugService::new(Arc::new(MemoryStore::new()), APP.to_string())
}

fn entry(name: &str, quantity: &str, rate: &str) -> DrugEntry {
    DrugEntry {
        drug_name: name.to_string(),
        quantity: dec(quantity),
        quantity_unit: Unit::Kg,
        price_per_unit: dec(rate),
        price: None,
        preparation: None,
        extra: Map::new(),
    }
}

#[tokio::test]
async fn total_price_is_computed_when_absent() {
    let service = service();

    let record = service.add_entry(UID, entry("Ashwagandha", "2", "450")).await.unwrap();

    assert_eq!(record.price, dec("900"));
}

#[tokio::test]
async fn explicit_price_is_kept_as_entered() {
    let service = service();
    let mut e = entry("Ashwagandha", "2", "450");
    e.price = Some(dec("850"));

    let record = service.add_entry(UID, e).await.unwrap();

    assert_eq!(record.price, dec("850"));
}

#[tokio::test]
async fn listing_sorts_by_name_case_insensitively() {
    let service = service();
    service.add_entry(UID, entry("triphala", "1", "300")).await.unwrap();
    service.add_entry(UID, entry("Amla", "1", "120")).await.unwrap();
    service.add_entry(UID, entry("Brahmi", "1", "200")).await.unwrap();

    let names: Vec<String> = service
        .list(UID)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.drug_name)
        .collect();

    assert_eq!(names, vec!["Amla", "Brahmi", "triphala"]);
}

#[tokio::test]
async fn search_matches_substrings_case_insensitively() {
    let service = service();
    service.add_entry(UID, entry("Ashwagandha", "1", "450")).await.unwrap();
    service.add_entry(UID, entry("Shatavari", "1", "380")).await.unwrap();
    service.add_entry(UID, entry("Brahmi", "1", "200")).await.unwrap();

    let hits = service.search(UID, "sha").await.unwrap();

    let names: Vec<&str> = hits.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(names, vec!["Ashwagandha", "Shatavari"]);
}

#[tokio::test]
async fn history_matches_exact_name_newest_first() {
    let service = service();
    service.add_entry(UID, entry("Amla", "1", "120")).await.unwrap();
    service.add_entry(UID, entry("Amla", "2", "130")).await.unwrap();
    service.add_entry(UID, entry("amla", "3", "140")).await.unwrap();

    let history = service.history(UID, "Amla").await.unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].timestamp >= history[1].timestamp);
}

#[tokio::test]
async fn extra_fields_round_trip_through_the_store() {
    let service = service();
    let mut e = entry("Amla", "1", "120");
    e.preparation = Some("churna".to_string());
    e.extra
        .insert("batchNo".to_string(), Value::String("B-17".to_string()));

    service.add_entry(UID, e).await.unwrap();

    let listed = service.list(UID).await.unwrap();
    assert_eq!(listed[0].preparation.as_deref(), Some("churna"));
    assert_eq!(listed[0].extra["batchNo"], "B-17");
}

#[tokio::test]
async fn blank_drug_name_is_rejected() {
    let service = service();

    let result = service.add_entry(UID, entry("", "1", "120")).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(service.list(UID).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_removes_only_that_entry() {
    let service = service();
    let first = service.add_entry(UID, entry("Amla", "1", "120")).await.unwrap();
    service.add_entry(UID, entry("Brahmi", "1", "200")).await.unwrap();

    service.delete_entry(UID, first.id).await.unwrap();

    let remaining = service.list(UID).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].drug_name, "Brahmi");
}
