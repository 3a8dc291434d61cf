use serde::{Deserialize, Serialize};

use crate::currency::is_currency_code;

/// One completed conversion, as kept in the local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl ConversionRecord {
    /// Build a record stamped with the current time.
    pub fn new(from: &str, to: &str, amount: f64, result: f64, rate: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            result,
            rate,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether every field satisfies the record invariants as of `now_ms`.
    pub fn is_well_formed(&self, now_ms: i64) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        is_currency_code(&self.from)
            && is_currency_code(&self.to)
            && positive(self.amount)
            && positive(self.result)
            && positive(self.rate)
            && self.timestamp > 0
            && self.timestamp <= now_ms
    }
}
