//! Typed parsing of persisted blobs.
//!
//! Each parser turns a raw stored string into typed records or a
//! [`SchemaRejection`] saying why the blob cannot be trusted.

use meteofx_currency::{is_currency_code, ConversionRecord};
use serde_json::Value;
use thiserror::Error;

use crate::search_history::SearchHistoryEntry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaRejection {
    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("expected {0}")]
    Shape(&'static str),

    #[error("entry {index} is invalid: {reason}")]
    Entry { index: usize, reason: String },
}

fn parse_json(raw: &str) -> Result<Value, SchemaRejection> {
    serde_json::from_str(raw).map_err(|e| SchemaRejection::Malformed(e.to_string()))
}

fn entry_error(index: usize, reason: impl ToString) -> SchemaRejection {
    SchemaRejection::Entry {
        index,
        reason: reason.to_string(),
    }
}

/// Parse a `{"conversions": [...]}` history blob.
///
/// Every record must be well formed as of `now_ms`; one bad record rejects
/// the whole blob. Only the newest `max` records are kept.
pub fn parse_history(
    raw: &str,
    now_ms: i64,
    max: usize,
) -> Result<Vec<ConversionRecord>, SchemaRejection> {
    let value = parse_json(raw)?;
    let entries = value
        .get("conversions")
        .and_then(Value::as_array)
        .ok_or(SchemaRejection::Shape("an object with a `conversions` array"))?;

    let mut records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let record: ConversionRecord =
                serde_json::from_value(entry.clone()).map_err(|e| entry_error(index, e))?;
            if !record.is_well_formed(now_ms) {
                return Err(entry_error(index, "field out of range"));
            }
            Ok(record)
        })
        .collect::<Result<Vec<_>, _>>()?;
    records.truncate(max);
    Ok(records)
}

/// Keep valid, unique codes in order, at most `max` of them.
pub fn normalize_codes<'a>(codes: impl IntoIterator<Item = &'a str>, max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(max);
    for code in codes {
        if out.len() == max {
            break;
        }
        if is_currency_code(code) && !out.iter().any(|c| c == code) {
            out.push(code.to_string());
        }
    }
    out
}

/// Parse a favorites blob: a JSON array of currency codes.
///
/// Non-string and malformed entries are skipped rather than rejected.
pub fn parse_favorites(raw: &str, max: usize) -> Result<Vec<String>, SchemaRejection> {
    let value = parse_json(raw)?;
    let entries = value
        .as_array()
        .ok_or(SchemaRejection::Shape("an array of currency codes"))?;

    Ok(normalize_codes(entries.iter().filter_map(Value::as_str), max))
}

/// Parse a weather search history blob.
pub fn parse_search_history(
    raw: &str,
    max: usize,
) -> Result<Vec<SearchHistoryEntry>, SchemaRejection> {
    let value = parse_json(raw)?;
    let entries = value
        .as_array()
        .ok_or(SchemaRejection::Shape("an array of search entries"))?;

    let mut out: Vec<SearchHistoryEntry> = Vec::with_capacity(max);
    for (index, entry) in entries.iter().enumerate() {
        let entry: SearchHistoryEntry =
            serde_json::from_value(entry.clone()).map_err(|e| entry_error(index, e))?;
        if !entry.is_well_formed() {
            return Err(entry_error(index, "empty code or name"));
        }
        if out.len() < max && !out.iter().any(|e| e.city_code == entry.city_code) {
            out.push(entry);
        }
    }
    Ok(out)
}
