//! Favorite currencies.

use meteofx_currency::is_supported;
use thiserror::Error;

use crate::kv::{KeyValueStore, StorageError, StorageResult};
use crate::local::{read_healing, write_json, LocalStore};
use crate::schema::{normalize_codes, parse_favorites};

pub const FAVORITES_KEY: &str = "currency_favorites";
pub const MAX_FAVORITES: usize = 5;

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("You can only select up to {0} favorite currencies.")]
    LimitReached(usize),

    #[error("Unsupported currency code: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn load(kv: &dyn KeyValueStore) -> Vec<String> {
    read_healing(kv, FAVORITES_KEY, |raw| parse_favorites(raw, MAX_FAVORITES)).unwrap_or_default()
}

fn store(kv: &dyn KeyValueStore, favorites: &[String]) -> StorageResult<Vec<String>> {
    let normalized = normalize_codes(favorites.iter().map(String::as_str), MAX_FAVORITES);
    write_json(kv, FAVORITES_KEY, &normalized)?;
    Ok(normalized)
}

impl LocalStore {
    /// Up to 5 unique currency codes, in the order they were added.
    pub fn favorite_currencies(&self) -> Vec<String> {
        self.with_backend(load).unwrap_or_default()
    }

    /// Persist `favorites`, keeping only valid unique codes, at most 5.
    pub fn save_favorite_currencies(&self, favorites: &[String]) -> StorageResult<()> {
        self.with_backend(|kv| store(kv, favorites).map(|_| ()))
            .unwrap_or(Ok(()))
    }

    /// Remove `code` if it is a favorite, otherwise add it.
    ///
    /// Returns the updated favorites.
    pub fn toggle_favorite(&self, code: &str) -> Result<Vec<String>, FavoriteError> {
        self.with_backend(|kv| {
            let mut favorites = load(kv);

            if let Some(pos) = favorites.iter().position(|c| c == code) {
                favorites.remove(pos);
            } else {
                if !is_supported(code) {
                    return Err(FavoriteError::Unsupported(code.to_string()));
                }
                if favorites.len() >= MAX_FAVORITES {
                    return Err(FavoriteError::LimitReached(MAX_FAVORITES));
                }
                favorites.push(code.to_string());
            }

            Ok(store(kv, &favorites)?)
        })
        .unwrap_or_else(|| Ok(Vec::new()))
    }

    pub fn clear_favorites(&self) -> StorageResult<()> {
        self.save_favorite_currencies(&[])
    }
}
