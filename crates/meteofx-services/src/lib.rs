//! Client-side services for meteofx
//!
//! Local persistence (conversion history, favorite currencies, weather search
//! history) over a pluggable key-value backend, the converter session and an
//! HTTP client for the meteofx API.

pub mod client;
pub mod converter;
pub mod favorites;
pub mod history;
pub mod kv;
pub mod local;
pub mod schema;
pub mod search_history;

pub use client::{ApiClient, ClientError, WeatherLookup};
pub use converter::{ConversionError, ConverterSession};
pub use favorites::{FavoriteError, FAVORITES_KEY, MAX_FAVORITES};
pub use history::{HISTORY_KEY, MAX_HISTORY_ITEMS};
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use local::LocalStore;
pub use schema::SchemaRejection;
pub use search_history::{SearchHistoryEntry, MAX_SEARCH_HISTORY, SEARCH_HISTORY_KEY};
