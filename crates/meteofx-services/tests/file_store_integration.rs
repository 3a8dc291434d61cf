//! LocalStore behaviour over a FileStore in a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use meteofx_currency::ConversionRecord;
use meteofx_services::{FileStore, KeyValueStore, LocalStore, HISTORY_KEY};

#[test]
fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = LocalStore::new(FileStore::open(dir.path()).unwrap());
        store
            .save_conversion(ConversionRecord::new("USD", "EUR", 100.0, 92.0, 0.92))
            .unwrap();
        store.toggle_favorite("GBP").unwrap();
        store.add_search("vilnius", "Vilnius").unwrap();
    }

    let store = LocalStore::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(store.conversion_history().len(), 1);
    assert_eq!(store.favorite_currencies(), vec!["GBP".to_string()]);
    assert_eq!(store.search_history()[0].city_name, "Vilnius");
}

#[test]
fn test_corrupted_file_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::open(dir.path()).unwrap();
    files.set(HISTORY_KEY, "{\"conversions\": [").unwrap();

    let store = LocalStore::new(files.clone());
    assert!(store.conversion_history().is_empty());
    assert_eq!(files.get(HISTORY_KEY).unwrap(), None);
    assert!(!dir.path().join("currency_converter_history.json").exists());
}
