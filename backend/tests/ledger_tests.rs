//! Material ledger projection tests
//!
//! The purchase log is append-only; the current inventory view is the
//! latest record per material name. These tests cover the projection, the
//! history view, the low-stock predicate, and the category roll-up.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::PurchaseRecord;
use shared::units::Unit;
use stockbook_backend::services::ledger;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

fn purchase(material: &str, seconds: i64, stock: &str, min: &str) -> PurchaseRecord {
    PurchaseRecord {
        id: Uuid::new_v4(),
        material: material.to_string(),
        dealer: None,
        gst_number: None,
        description: None,
        quantity: dec(stock),
        quantity_unit: Unit::Kg,
        price_per_unit: dec("10"),
        price: dec(stock) * dec("10"),
        gst: Decimal::ZERO,
        hamali: Decimal::ZERO,
        transportation: Decimal::ZERO,
        min_quantity: dec(min),
        min_quantity_unit: Unit::Kg,
        stock: dec(stock),
        updated_cost_per_unit: Some(dec("10")),
        categories: vec![],
        bill_photo_url: None,
        timestamp: at(seconds),
        updated_at: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The projection keeps the record with the greatest timestamp per name
    #[test]
    fn test_projection_picks_latest_per_material() {
        let purchases = vec![
            purchase("A", 1, "10", "0"),
            purchase("A", 3, "30", "0"),
            purchase("B", 2, "20", "0"),
        ];

        let latest = ledger::project(&purchases);

        assert_eq!(latest.len(), 2);
        assert_eq!(latest["A"].timestamp, at(3));
        assert_eq!(latest["A"].stock, dec("30"));
        assert_eq!(latest["B"].timestamp, at(2));
    }

    /// Equal timestamps resolve to the later entry in the slice
    #[test]
    fn test_projection_tie_breaks_deterministically() {
        let first = purchase("A", 5, "1", "0");
        let second = purchase("A", 5, "2", "0");
        let winner = second.id;

        let latest = ledger::project(&[first, second]);

        assert_eq!(latest["A"].id, winner);
    }

    /// Material names match exactly and case-sensitively
    #[test]
    fn test_history_is_case_sensitive() {
        let purchases = vec![
            purchase("Citric Acid", 1, "5", "0"),
            purchase("citric acid", 2, "7", "0"),
            purchase("Citric Acid", 3, "9", "0"),
        ];

        let history = ledger::history(&purchases, "Citric Acid");

        assert_eq!(history.len(), 2);
        // Newest first for display
        assert_eq!(history[0].timestamp, at(3));
        assert_eq!(history[1].timestamp, at(1));
    }

    #[test]
    fn test_history_of_unknown_material_is_empty() {
        let purchases = vec![purchase("A", 1, "5", "0")];
        assert!(ledger::history(&purchases, "B").is_empty());
    }

    /// latest_for agrees with the projection
    #[test]
    fn test_latest_for_single_material() {
        let purchases = vec![
            purchase("A", 1, "10", "0"),
            purchase("B", 5, "50", "0"),
            purchase("A", 3, "30", "0"),
        ];

        let latest = ledger::latest_for(&purchases, "A").unwrap();
        assert_eq!(latest.timestamp, at(3));
        assert!(ledger::latest_for(&purchases, "C").is_none());
    }

    /// Low stock is strictly below the reorder threshold
    #[test]
    fn test_low_stock_predicate() {
        assert!(purchase("A", 1, "4", "5").is_low_stock());
        assert!(!purchase("A", 1, "5", "5").is_low_stock());
        assert!(!purchase("A", 1, "6", "5").is_low_stock());
    }

    #[test]
    fn test_categories_roll_up_sorted_and_distinct() {
        let mut a = purchase("A", 1, "1", "0");
        a.categories = vec!["acids".to_string(), "base".to_string()];
        let mut b = purchase("B", 2, "1", "0");
        b.categories = vec!["base".to_string(), "aroma".to_string()];

        let labels = ledger::categories(&[a, b]);

        assert_eq!(labels, vec!["acids", "aroma", "base"]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        prop_oneof![Just("A".to_string()), Just("B".to_string()), Just("C".to_string())]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every projected record carries the maximum timestamp for its name
        #[test]
        fn prop_projection_maximizes_timestamp(
            entries in prop::collection::vec((name_strategy(), 0i64..1000), 1..30)
        ) {
            let purchases: Vec<PurchaseRecord> = entries
                .iter()
                .map(|(name, ts)| purchase(name, *ts, "1", "0"))
                .collect();

            let latest = ledger::project(&purchases);

            for record in purchases.iter() {
                let projected = &latest[&record.material];
                prop_assert!(projected.timestamp >= record.timestamp);
            }
        }

        /// The projection has exactly one entry per distinct name
        #[test]
        fn prop_projection_covers_every_name(
            entries in prop::collection::vec((name_strategy(), 0i64..1000), 1..30)
        ) {
            let purchases: Vec<PurchaseRecord> = entries
                .iter()
                .map(|(name, ts)| purchase(name, *ts, "1", "0"))
                .collect();

            let latest = ledger::project(&purchases);

            let mut names: Vec<&String> = purchases.iter().map(|p| &p.material).collect();
            names.sort();
            names.dedup();
            prop_assert_eq!(latest.len(), names.len());
        }

        /// History never invents records and preserves membership
        #[test]
        fn prop_history_is_a_filter(
            entries in prop::collection::vec((name_strategy(), 0i64..1000), 0..30)
        ) {
            let purchases: Vec<PurchaseRecord> = entries
                .iter()
                .map(|(name, ts)| purchase(name, *ts, "1", "0"))
                .collect();

            let history = ledger::history(&purchases, "A");
            let expected = purchases.iter().filter(|p| p.material == "A").count();

            prop_assert_eq!(history.len(), expected);
            prop_assert!(history.iter().all(|r| r.material == "A"));
            // Sorted newest first
            prop_assert!(history.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        }
    }
}

// ============================================================================
// Service Tests (in-memory store)
// ============================================================================

#[cfg(test)]
mod service_tests {
    use super::*;
    use std::sync::Arc;
    use stockbook_backend::services::LedgerService;
    use stockbook_backend::store::{document_body, CollectionPath, DocumentStore, MemoryStore};

    const UID: &str = "user-1";
    const APP: &str = "test-app";

    async fn seed(store: &MemoryStore, record: &PurchaseRecord) {
        let path = CollectionPath::materials(APP, UID);
        store
            .add(&path, document_body(record).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn latest_snapshots_project_the_stored_log() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &purchase("A", 1, "10", "0")).await;
        seed(&store, &purchase("A", 3, "30", "0")).await;
        seed(&store, &purchase("B", 2, "20", "0")).await;

        let service = LedgerService::new(store, APP.to_string());
        let latest = service.latest_snapshots(UID).await.unwrap();

        assert_eq!(latest.len(), 2);
        assert_eq!(latest["A"].stock, dec("30"));
        assert_eq!(latest["B"].stock, dec("20"));
    }

    #[tokio::test]
    async fn low_stock_lists_only_depleted_materials_sorted_by_name() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &purchase("zinc", 1, "2", "5")).await;
        seed(&store, &purchase("Amla", 2, "1", "5")).await;
        seed(&store, &purchase("Basil", 3, "50", "5")).await;

        let service = LedgerService::new(store, APP.to_string());
        let low = service.low_stock(UID).await.unwrap();

        let names: Vec<&str> = low.iter().map(|r| r.material.as_str()).collect();
        assert_eq!(names, vec!["Amla", "zinc"]);
    }

    #[tokio::test]
    async fn history_reads_through_the_store() {
        let store = Arc::new(MemoryStore::new());
        seed(&store, &purchase("A", 1, "10", "0")).await;
        seed(&store, &purchase("A", 2, "20", "0")).await;

        let service = LedgerService::new(store, APP.to_string());
        let history = service.material_history(UID, "A").await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].stock, dec("20"));
    }
}
