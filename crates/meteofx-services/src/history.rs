//! Conversion history, newest first.

use meteofx_currency::ConversionRecord;
use serde::Serialize;

use crate::kv::{KeyValueStore, StorageError, StorageResult};
use crate::local::{read_healing, remove_key, write_json, LocalStore};
use crate::schema::{parse_history, SchemaRejection};

pub const HISTORY_KEY: &str = "currency_converter_history";
pub const MAX_HISTORY_ITEMS: usize = 10;

#[derive(Serialize)]
struct HistoryBlob<'a> {
    conversions: &'a [ConversionRecord],
}

fn load(kv: &dyn KeyValueStore) -> Vec<ConversionRecord> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    read_healing(kv, HISTORY_KEY, |raw| {
        parse_history(raw, now_ms, MAX_HISTORY_ITEMS)
    })
    .unwrap_or_default()
}

impl LocalStore {
    /// Stored conversions, newest first. Corrupted history reads as empty
    /// and is removed.
    pub fn conversion_history(&self) -> Vec<ConversionRecord> {
        self.with_backend(load).unwrap_or_default()
    }

    /// Prepend `record`, keeping the 10 most recent.
    pub fn save_conversion(&self, record: ConversionRecord) -> StorageResult<()> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        if !record.is_well_formed(now_ms) {
            return Err(StorageError::Rejected(SchemaRejection::Entry {
                index: 0,
                reason: "field out of range".to_string(),
            }));
        }

        self.with_backend(|kv| {
            let mut history = load(kv);
            history.insert(0, record);
            history.truncate(MAX_HISTORY_ITEMS);
            write_json(kv, HISTORY_KEY, &HistoryBlob { conversions: &history })
        })
        .unwrap_or(Ok(()))
    }

    pub fn clear_conversion_history(&self) -> StorageResult<()> {
        self.with_backend(|kv| remove_key(kv, HISTORY_KEY))
            .unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::kv::MemoryStore;

    fn record(amount: f64) -> ConversionRecord {
        ConversionRecord::new("USD", "EUR", amount, amount * 0.92, 0.92)
    }

    #[test]
    fn test_missing_key_is_empty() {
        let store = LocalStore::new(MemoryStore::new());
        assert!(store.conversion_history().is_empty());
    }

    #[test]
    fn test_save_prepends_and_caps() {
        let store = LocalStore::new(MemoryStore::new());
        for i in 1..=12 {
            store.save_conversion(record(i as f64)).unwrap();
        }

        let history = store.conversion_history();
        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        assert_eq!(history[0].amount, 12.0);
        assert_eq!(history[9].amount, 3.0);
    }

    #[test]
    fn test_corrupted_history_heals() {
        let kv = MemoryStore::new();
        let store = LocalStore::new(kv.clone());

        for blob in [
            "{oops",
            "null",
            r#"{"conversions": "nope"}"#,
            r#"{"conversions": [{"from": "USD", "to": "EUR", "amount": -1, "result": 1, "rate": 1, "timestamp": 1}]}"#,
        ] {
            kv.set(HISTORY_KEY, blob).unwrap();
            assert!(store.conversion_history().is_empty(), "blob: {}", blob);
            assert!(!kv.contains_key(HISTORY_KEY), "blob: {}", blob);
        }
    }

    #[test]
    fn test_save_after_corruption_starts_fresh() {
        let kv = MemoryStore::new();
        kv.set(HISTORY_KEY, "[1, 2, 3]").unwrap();
        let store = LocalStore::new(kv);

        store.save_conversion(record(5.0)).unwrap();
        assert_eq!(store.conversion_history().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_record() {
        let store = LocalStore::new(MemoryStore::new());
        let mut bad = record(1.0);
        bad.from = "usd".to_string();

        assert!(matches!(store.save_conversion(bad), Err(StorageError::Rejected(_))));
        assert!(store.conversion_history().is_empty());
    }

    #[test]
    fn test_overlong_history_is_capped_not_discarded() {
        let kv = MemoryStore::new();
        let records: Vec<ConversionRecord> = (1..=11).map(|i| record(i as f64)).collect();
        kv.set(
            HISTORY_KEY,
            &serde_json::to_string(&HistoryBlob { conversions: &records }).unwrap(),
        )
        .unwrap();
        let store = LocalStore::new(kv.clone());

        let history = store.conversion_history();
        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        assert_eq!(history[0].amount, 1.0);
        assert!(kv.contains_key(HISTORY_KEY));

        store.save_conversion(record(42.0)).unwrap();
        let history = store.conversion_history();
        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        assert_eq!(history[0].amount, 42.0);
        assert_eq!(history[1].amount, 1.0);
    }

    #[test]
    fn test_clear() {
        let kv = MemoryStore::new();
        let store = LocalStore::new(kv.clone());
        store.save_conversion(record(1.0)).unwrap();

        store.clear_conversion_history().unwrap();
        assert!(!kv.contains_key(HISTORY_KEY));
        assert!(store.conversion_history().is_empty());
    }

    #[test]
    fn test_detached_is_noop() {
        let store = LocalStore::detached();
        store.save_conversion(record(1.0)).unwrap();
        assert!(store.conversion_history().is_empty());
        store.clear_conversion_history().unwrap();
    }
}
