// ═══════════════════════════════════════════════════════════════════
// Storage Tests — key schema, in-memory store, repository, snapshots
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;

use spendguard_core::config::StoreConfig;
use spendguard_core::errors::CoreError;
use spendguard_core::models::budget::{Budget, Period};
use spendguard_core::models::expense::Expense;
use spendguard_core::models::item::Item;
use spendguard_core::models::receipt::ReceiptExpense;
use spendguard_core::models::settings::Settings;
use spendguard_core::storage::keys;
use spendguard_core::storage::memory::InMemoryStore;
use spendguard_core::storage::repository::Repository;
use spendguard_core::storage::traits::{RecordStore, ScanOrder};

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn store() -> InMemoryStore {
    InMemoryStore::new(StoreConfig::new("spendguard-test"))
}

fn repository() -> Repository {
    Repository::new(Arc::new(store()))
}

fn item(value: Value) -> Item {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn budget(id: &str, category: &str) -> Budget {
    Budget {
        budget_id: id.into(),
        category: category.into(),
        limit: dec!(500),
        period: Period::Monthly,
        created_at: "2024-03-01T00:00:00.000Z".into(),
    }
}

fn expense(id: &str, date: &str, amount: rust_decimal::Decimal) -> Expense {
    Expense {
        expense_id: id.into(),
        amount,
        category: "Groceries".into(),
        date: date.into(),
        created_at: format!("{date}T09:00:00.000Z"),
        notes: None,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Key schema
// ═══════════════════════════════════════════════════════════════════

mod key_schema {
    use super::*;

    #[test]
    fn key_formats() {
        assert_eq!(keys::user_pk("u1"), "USER#u1");
        assert_eq!(keys::budget_sk("b1"), "BUDGET#b1");
        assert_eq!(keys::expense_sk("2024-03-08", "e1"), "EXPENSE#2024-03-08#e1");
        assert_eq!(keys::expense_index_sk("2024-03-08"), "EXPENSE#2024-03-08");
        assert_eq!(
            keys::receipt_expense_sk("2024-03-08T10:15:00.000Z"),
            "EXPENSE#2024-03-08T10:15:00.000Z"
        );
    }

    #[test]
    fn index_upper_bound_covers_timestamps_on_that_day() {
        let upper = keys::expense_index_upper("2024-03-08");
        assert!(keys::expense_index_sk("2024-03-08") <= upper);
        assert!(keys::receipt_expense_sk("2024-03-08T23:59:59.999Z") <= upper);
        assert!(keys::receipt_expense_sk("2024-03-09T00:00:00.000Z") > upper);
    }

    #[test]
    fn date_from_sort_key() {
        assert_eq!(keys::date_from_expense_sk("EXPENSE#2024-03-08#e1"), Some("2024-03-08"));
        assert_eq!(keys::date_from_expense_sk("EXPENSE#2024-03-08"), Some("2024-03-08"));
        assert_eq!(
            keys::date_from_expense_sk("EXPENSE#2024-03-08T10:15:00.000Z"),
            Some("2024-03-08T10:15:00.000Z")
        );
        assert_eq!(keys::date_from_expense_sk("EXPENSE#"), None);
        assert_eq!(keys::date_from_expense_sk("BUDGET#b1"), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// In-memory store
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = store();
        assert!(store.is_empty());

        store
            .put(item(json!({"PK": "USER#u1", "SK": "SETTINGS", "currency": "ZAR"})))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        let got = store.get("USER#u1", "SETTINGS").await.unwrap().unwrap();
        assert_eq!(got.get("currency"), Some(&json!("ZAR")));
        assert!(store.get("USER#u2", "SETTINGS").await.unwrap().is_none());

        assert!(store.delete("USER#u1", "SETTINGS").await.unwrap());
        assert!(!store.delete("USER#u1", "SETTINGS").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_replaces_whole_item() {
        let store = store();
        store
            .put(item(json!({"PK": "P", "SK": "S", "a": 1, "b": 2})))
            .await
            .unwrap();
        store.put(item(json!({"PK": "P", "SK": "S", "a": 3}))).await.unwrap();

        let got = store.get("P", "S").await.unwrap().unwrap();
        assert_eq!(got.get("a"), Some(&json!(3)));
        assert!(got.get("b").is_none());
    }

    #[tokio::test]
    async fn items_need_string_keys() {
        let err = store().put(item(json!({"PK": "P"}))).await.unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));

        let err = store().put(item(json!({"PK": "P", "SK": 7}))).await.unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[tokio::test]
    async fn prefix_query_is_scoped_and_ordered() {
        let store = store();
        for (pk, sk) in [
            ("USER#a", "BUDGET#2"),
            ("USER#a", "BUDGET#1"),
            ("USER#a", "EXPENSE#2024-01-01#x"),
            ("USER#ab", "BUDGET#9"),
            ("USER#b", "BUDGET#3"),
        ] {
            store.put(item(json!({"PK": pk, "SK": sk}))).await.unwrap();
        }

        let sks = |items: Vec<Item>| -> Vec<String> {
            items
                .iter()
                .map(|i| i["SK"].as_str().unwrap().to_string())
                .collect()
        };

        let asc = store.query_prefix("USER#a", "BUDGET#", ScanOrder::Ascending).await.unwrap();
        assert_eq!(sks(asc), vec!["BUDGET#1", "BUDGET#2"]);

        let desc = store.query_prefix("USER#a", "BUDGET#", ScanOrder::Descending).await.unwrap();
        assert_eq!(sks(desc), vec!["BUDGET#2", "BUDGET#1"]);

        let none = store.query_prefix("USER#c", "BUDGET#", ScanOrder::Ascending).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn index_range_is_inclusive() {
        let store = store();
        for (sk, idx) in [
            ("EXPENSE#2024-03-01#a", "EXPENSE#2024-03-01"),
            ("EXPENSE#2024-03-05#b", "EXPENSE#2024-03-05"),
            ("EXPENSE#2024-03-10#c", "EXPENSE#2024-03-10"),
        ] {
            store
                .put(item(json!({"PK": "USER#u", "SK": sk, "GSI1PK": "USER#u", "GSI1SK": idx})))
                .await
                .unwrap();
        }
        store
            .put(item(json!({"PK": "USER#v", "SK": "EXPENSE#2024-03-05#z", "GSI1PK": "USER#v", "GSI1SK": "EXPENSE#2024-03-05"})))
            .await
            .unwrap();

        let hits = store
            .query_index_range("USER#u", "EXPENSE#2024-03-01", "EXPENSE#2024-03-05", ScanOrder::Descending)
            .await
            .unwrap();
        let sks: Vec<_> = hits.iter().map(|i| i["SK"].as_str().unwrap()).collect();
        assert_eq!(sks, vec!["EXPENSE#2024-03-05#b", "EXPENSE#2024-03-01#a"]);
    }

    #[test]
    fn local_endpoint_config() {
        let store = InMemoryStore::new(StoreConfig::new("t").with_endpoint("http://localhost:8000"));
        assert!(store.config().is_local());
        assert_eq!(store.config().region.as_deref(), Some("local"));
        assert_eq!(store.name(), "t");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Snapshots
// ═══════════════════════════════════════════════════════════════════

mod snapshots {
    use super::*;

    #[tokio::test]
    async fn bytes_round_trip_preserves_items() {
        let store = store();
        store
            .put(item(json!({"PK": "USER#u", "SK": "SETTINGS", "alertsEnabled": true})))
            .await
            .unwrap();
        store
            .put(item(json!({"PK": "USER#u", "SK": "BUDGET#b", "limit": 12.5})))
            .await
            .unwrap();

        let bytes = store.to_bytes().unwrap();
        let restored = InMemoryStore::from_bytes(StoreConfig::new("copy"), &bytes).unwrap();
        assert_eq!(restored.len(), 2);
        let budget = restored.get("USER#u", "BUDGET#b").await.unwrap().unwrap();
        assert_eq!(budget["limit"], json!(12.5));
    }

    #[tokio::test]
    async fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        let path = path.to_str().unwrap();

        let repo_store = Arc::new(store());
        let repo = Repository::new(repo_store.clone());
        repo.put_budget("u1", &budget("b1", "Groceries")).await.unwrap();
        repo_store.save_to_file(path).unwrap();

        let loaded = InMemoryStore::load_from_file(StoreConfig::new("loaded"), path).unwrap();
        let budgets = Repository::new(Arc::new(loaded)).list_budgets("u1").await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].category.as_deref(), Some("Groceries"));
    }

    #[test]
    fn corrupt_snapshot_fails() {
        let err = InMemoryStore::from_bytes(StoreConfig::new("t"), b"{not json").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));

        let err = InMemoryStore::from_bytes(StoreConfig::new("t"), br#"[{"PK": "x"}]"#).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = InMemoryStore::load_from_file(StoreConfig::new("t"), path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Repository
// ═══════════════════════════════════════════════════════════════════

mod repository_ops {
    use super::*;

    #[tokio::test]
    async fn budgets_are_scoped_per_user() {
        let repo = repository();
        repo.put_budget("u1", &budget("b1", "Groceries")).await.unwrap();
        repo.put_budget("u1", &budget("b2", "Dining")).await.unwrap();
        repo.put_budget("u2", &budget("b3", "Travel")).await.unwrap();

        let mine = repo.list_budgets("u1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.validate().is_ok()));
        assert_eq!(repo.list_budgets("u2").await.unwrap().len(), 1);
        assert!(repo.list_budgets("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn budget_put_replaces_same_id() {
        let repo = repository();
        repo.put_budget("u1", &budget("b1", "Groceries")).await.unwrap();
        let mut changed = budget("b1", "Groceries");
        changed.limit = dec!(750);
        repo.put_budget("u1", &changed).await.unwrap();

        let budgets = repo.list_budgets("u1").await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].limit, Some(dec!(750)));
        assert_eq!(budgets[0].period, Some(Period::Monthly));
    }

    #[tokio::test]
    async fn delete_budget_reports_missing() {
        let repo = repository();
        repo.put_budget("u1", &budget("b1", "Groceries")).await.unwrap();

        repo.delete_budget("u1", "b1").await.unwrap();
        let err = repo.delete_budget("u1", "b1").await.unwrap_err();
        assert_eq!(err.to_string(), "Budget not found: b1");
    }

    #[tokio::test]
    async fn same_day_expenses_do_not_collide() {
        let repo = repository();
        repo.put_expense("u1", &expense("e1", "2024-03-08", dec!(10))).await.unwrap();
        repo.put_expense("u1", &expense("e2", "2024-03-08", dec!(20))).await.unwrap();

        let all = repo.list_expenses("u1", None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all
            .iter()
            .all(|e| e.sort_key.as_deref().is_some_and(|sk| sk.starts_with("EXPENSE#2024-03-08#"))));
    }

    #[tokio::test]
    async fn expenses_newest_first_with_optional_range() {
        let repo = repository();
        for (id, date) in [("e1", "2024-03-01"), ("e2", "2024-03-10"), ("e3", "2024-03-05")] {
            repo.put_expense("u1", &expense(id, date, dec!(1))).await.unwrap();
        }

        let dates = |list: Vec<spendguard_core::models::expense::ExpenseRecord>| -> Vec<String> {
            list.into_iter().filter_map(|e| e.date).collect()
        };

        let all = repo.list_expenses("u1", None).await.unwrap();
        assert_eq!(dates(all), vec!["2024-03-10", "2024-03-05", "2024-03-01"]);

        let ranged = repo
            .list_expenses("u1", Some((day(2024, 3, 1), day(2024, 3, 5))))
            .await
            .unwrap();
        assert_eq!(dates(ranged), vec!["2024-03-05", "2024-03-01"]);
    }

    #[tokio::test]
    async fn decimal_amounts_survive_storage() {
        let repo = repository();
        repo.put_expense("u1", &expense("e1", "2024-03-08", dec!(12.35))).await.unwrap();
        let list = repo.list_expenses("u1", None).await.unwrap();
        assert_eq!(list[0].amount, Some(dec!(12.35)));
    }

    #[tokio::test]
    async fn delete_expense_by_id() {
        let repo = repository();
        repo.put_expense("u1", &expense("e1", "2024-03-08", dec!(10))).await.unwrap();
        repo.put_expense("u1", &expense("e2", "2024-03-09", dec!(20))).await.unwrap();

        repo.delete_expense("u1", "e1").await.unwrap();
        let left = repo.list_expenses("u1", None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].expense_id.as_deref(), Some("e2"));

        let err = repo.delete_expense("u1", "e1").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        // Another user's expense is invisible.
        assert!(repo.delete_expense("u2", "e2").await.is_err());
    }

    #[tokio::test]
    async fn receipt_item_keeps_timestamp_keys() {
        let repo = repository();
        let receipt = ReceiptExpense {
            user_id: "u1".into(),
            expense_id: "r1".into(),
            amount: dec!(145.5),
            category: "Groceries".into(),
            date: "2024-03-14T10:00:00.000Z".into(),
            created_at: "2024-03-14T10:00:00.000Z".into(),
            notes: "Mock OCR: receipt processed".into(),
            receipt_key: "receipts/u1/abc.jpg".into(),
        };
        repo.put_receipt_expense(&receipt).await.unwrap();

        let raw = repo
            .store()
            .get("USER#u1", "EXPENSE#2024-03-14T10:00:00.000Z")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(raw.get("userId"), Some(&json!("u1")));
        assert_eq!(raw.get("GSI1PK"), Some(&json!("USER#u1")));
        assert_eq!(raw.get("GSI1SK"), Some(&json!("EXPENSE#2024-03-14T10:00:00.000Z")));
        assert_eq!(raw.get("amount"), Some(&json!(145.5)));
        assert_eq!(raw.get("date"), Some(&json!("2024-03-14T10:00:00.000Z")));
        assert_eq!(raw.get("notes"), Some(&json!("Mock OCR: receipt processed")));
        assert_eq!(raw.get("receiptKey"), Some(&json!("receipts/u1/abc.jpg")));

        let listed = repo.list_expenses("u1", None).await.unwrap();
        assert_eq!(listed[0].amount, Some(dec!(145.5)));
        assert_eq!(listed[0].receipt_key.as_deref(), Some("receipts/u1/abc.jpg"));
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let repo = repository();
        assert!(repo.get_settings("u1").await.unwrap().is_none());

        let settings = Settings {
            alerts_enabled: true,
            weekly_summary: true,
            currency: "USD".into(),
            email: Some("u1@example.com".into()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().to_rfc3339()),
        };
        repo.put_settings("u1", &settings).await.unwrap();
        assert_eq!(repo.get_settings("u1").await.unwrap(), Some(settings));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Lenient decoding of stored items
// ═══════════════════════════════════════════════════════════════════

mod lenient_decoding {
    use super::*;

    async fn seeded(raw: Value) -> Repository {
        let store = store();
        store.put(item(raw)).await.unwrap();
        Repository::new(Arc::new(store))
    }

    #[tokio::test]
    async fn string_amount_is_missing() {
        let repo = seeded(json!({
            "PK": "USER#u", "SK": "EXPENSE#2024-03-08#x",
            "expenseId": "x", "amount": "12.50", "category": "Groceries", "date": "2024-03-08"
        }))
        .await;
        let list = repo.list_expenses("u", None).await.unwrap();
        assert_eq!(list[0].amount, None);
        assert_eq!(list[0].category.as_deref(), Some("Groceries"));
    }

    #[tokio::test]
    async fn legacy_note_attribute() {
        let repo = seeded(json!({
            "PK": "USER#u", "SK": "EXPENSE#2024-03-08#x",
            "amount": 3, "category": "Coffee", "note": "flat white"
        }))
        .await;
        let list = repo.list_expenses("u", None).await.unwrap();
        assert_eq!(list[0].notes.as_deref(), Some("flat white"));
        assert_eq!(list[0].date, None);
        assert_eq!(list[0].sort_key.as_deref(), Some("EXPENSE#2024-03-08#x"));
    }

    #[tokio::test]
    async fn unknown_period_and_non_numeric_limit() {
        let repo = seeded(json!({
            "PK": "USER#u", "SK": "BUDGET#b",
            "budgetId": "b", "category": "Groceries", "limit": "lots", "period": "Monthly"
        }))
        .await;
        let budgets = repo.list_budgets("u").await.unwrap();
        assert_eq!(budgets[0].period, None);
        assert_eq!(budgets[0].limit, None);
        assert!(budgets[0].validate().is_err());
    }

    #[tokio::test]
    async fn non_boolean_flags_read_false() {
        let repo = seeded(json!({
            "PK": "USER#u", "SK": "SETTINGS",
            "alertsEnabled": "yes", "weeklySummary": 1, "currency": ""
        }))
        .await;
        let settings = repo.get_settings("u").await.unwrap().unwrap();
        assert!(!settings.alerts_enabled);
        assert!(!settings.weekly_summary);
        assert_eq!(settings.currency, "ZAR");
        assert_eq!(settings.email, None);
    }
}
