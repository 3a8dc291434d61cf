//! Static rates served when every configured source fails.

use serde_json::{json, Map, Value};

pub const MOCK_BASE: &str = "USD";

pub const MOCK_RATES: [(&str, f64); 10] = [
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("JPY", 149.5),
    ("AUD", 1.52),
    ("CAD", 1.35),
    ("CHF", 0.88),
    ("CNY", 7.24),
    ("INR", 83.12),
    ("MXN", 17.25),
];

/// The fallback payload, shaped like a transformed source response.
pub fn mock_rates() -> Value {
    let rates: Map<String, Value> = MOCK_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), json!(rate)))
        .collect();

    json!({
        "base": MOCK_BASE,
        "rates": rates,
    })
}
