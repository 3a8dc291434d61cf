//! Validated exchange-rate sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::{convert, effective_rate, is_currency_code};
use crate::error::RatesRejection;

/// Rates for a set of currencies, all relative to `base`.
///
/// Only produced by [`validate_rates`] (or deserialized from our own API), so
/// `rates` is non-empty and every entry is a 3-letter code with a positive
/// finite value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSet {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    /// Epoch milliseconds at which the set was validated
    pub timestamp: i64,
}

impl ExchangeRateSet {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Convert `amount` from one currency to another through the base.
    ///
    /// Returns `(result, effective_rate)`, or `None` when either currency is
    /// missing from the set.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Option<(f64, f64)> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        Some((
            convert(amount, from_rate, to_rate),
            effective_rate(from_rate, to_rate),
        ))
    }
}

fn is_valid_rate(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v > 0.0)
}

/// Check and sanitize an untyped rate payload.
///
/// The payload must be an object with a string `base` and an object `rates`.
/// Rate entries whose key is not three uppercase letters or whose value is
/// not a positive finite number are dropped; if none remain the payload is
/// rejected.
pub fn validate_rates(data: &Value) -> Result<ExchangeRateSet, RatesRejection> {
    let obj = data.as_object().ok_or(RatesRejection::NotAnObject)?;

    let base = obj
        .get("base")
        .and_then(Value::as_str)
        .ok_or(RatesRejection::MissingBase)?;

    let raw_rates = obj
        .get("rates")
        .and_then(Value::as_object)
        .ok_or(RatesRejection::MissingRates)?;

    let rates: BTreeMap<String, f64> = raw_rates
        .iter()
        .filter(|(code, _)| is_currency_code(code))
        .filter_map(|(code, value)| is_valid_rate(value).map(|v| (code.clone(), v)))
        .collect();

    let dropped = raw_rates.len() - rates.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} invalid rate entries", dropped);
    }

    if rates.is_empty() {
        return Err(RatesRejection::NoValidRates);
    }

    Ok(ExchangeRateSet {
        base: base.to_string(),
        rates,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
