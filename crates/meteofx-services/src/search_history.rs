//! Recent weather searches.

use serde::{Deserialize, Serialize};

use crate::kv::{KeyValueStore, StorageError, StorageResult};
use crate::local::{read_healing, remove_key, write_json, LocalStore};
use crate::schema::{parse_search_history, SchemaRejection};

pub const SEARCH_HISTORY_KEY: &str = "weather-search-history";
pub const MAX_SEARCH_HISTORY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub city_code: String,
    pub city_name: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl SearchHistoryEntry {
    pub fn is_well_formed(&self) -> bool {
        !self.city_code.trim().is_empty() && !self.city_name.trim().is_empty() && self.timestamp > 0
    }
}

fn load(kv: &dyn KeyValueStore) -> Vec<SearchHistoryEntry> {
    read_healing(kv, SEARCH_HISTORY_KEY, |raw| {
        parse_search_history(raw, MAX_SEARCH_HISTORY)
    })
    .unwrap_or_default()
}

impl LocalStore {
    pub fn search_history(&self) -> Vec<SearchHistoryEntry> {
        self.with_backend(load).unwrap_or_default()
    }

    /// Record a search, moving an existing entry for the same place to the top.
    pub fn add_search(&self, city_code: &str, city_name: &str) -> StorageResult<()> {
        let entry = SearchHistoryEntry {
            city_code: city_code.to_string(),
            city_name: city_name.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        if !entry.is_well_formed() {
            return Err(StorageError::Rejected(SchemaRejection::Entry {
                index: 0,
                reason: "empty code or name".to_string(),
            }));
        }

        self.with_backend(|kv| {
            let mut history = load(kv);
            history.retain(|e| e.city_code != entry.city_code);
            history.insert(0, entry);
            history.truncate(MAX_SEARCH_HISTORY);
            write_json(kv, SEARCH_HISTORY_KEY, &history)
        })
        .unwrap_or(Ok(()))
    }

    pub fn clear_search_history(&self) -> StorageResult<()> {
        self.with_backend(|kv| remove_key(kv, SEARCH_HISTORY_KEY))
            .unwrap_or(Ok(()))
    }
}
