//! Supported currencies, user input validation and conversion arithmetic.

use serde::Serialize;

use crate::error::{AmountError, CurrencyCodeError};

/// Smallest accepted amount (exclusive).
pub const MIN_AMOUNT: f64 = 0.0;
/// Largest accepted amount (inclusive).
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;
pub const DEFAULT_DECIMALS: usize = 2;

/// A supported currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Currencies offered in pickers and accepted as favorites, in display order.
pub const CURRENCIES: [Currency; 10] = [
    Currency { code: "USD", name: "US Dollar", symbol: "$" },
    Currency { code: "EUR", name: "Euro", symbol: "€" },
    Currency { code: "GBP", name: "British Pound", symbol: "£" },
    Currency { code: "JPY", name: "Japanese Yen", symbol: "¥" },
    Currency { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    Currency { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
    Currency { code: "CHF", name: "Swiss Franc", symbol: "CHF" },
    Currency { code: "CNY", name: "Chinese Yuan", symbol: "¥" },
    Currency { code: "INR", name: "Indian Rupee", symbol: "₹" },
    Currency { code: "MXN", name: "Mexican Peso", symbol: "$" },
];

pub fn currency_by_code(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code == code)
}

pub fn is_supported(code: &str) -> bool {
    currency_by_code(code).is_some()
}

/// True when `code` is exactly three ASCII uppercase letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Normalize free-form input into a supported currency code.
///
/// Uppercases, strips everything that is not a letter and keeps the first
/// three characters.
pub fn sanitize_currency_code(raw: &str) -> Result<String, CurrencyCodeError> {
    let sanitized: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .take(3)
        .collect();

    if sanitized.len() != 3 {
        return Err(CurrencyCodeError::InvalidFormat);
    }

    if !is_supported(&sanitized) {
        return Err(CurrencyCodeError::Unsupported(sanitized));
    }

    Ok(sanitized)
}

/// Parse the leading decimal number of `value`, ignoring trailing garbage.
///
/// `"12.5abc"` parses as `12.5`; `"abc"` and `""` yield `None`.
pub fn parse_amount(value: &str) -> Option<f64> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }

    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

pub fn is_amount_in_range(amount: f64) -> bool {
    amount > MIN_AMOUNT && amount <= MAX_AMOUNT
}

/// Validate a raw amount string as typed by the user.
///
/// Returns the parsed amount, or an [`AmountError`] whose `Display` is the
/// message to show next to the input.
pub fn validate_amount(raw: &str) -> Result<f64, AmountError> {
    if raw.trim().is_empty() {
        return Err(AmountError::Empty);
    }

    let value = parse_amount(raw).ok_or(AmountError::NotANumber)?;

    if value <= MIN_AMOUNT {
        return Err(AmountError::NotPositive);
    }

    if value > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }

    Ok(value)
}

/// Convert `amount` between two currencies quoted against the same base.
pub fn convert(amount: f64, from_rate: f64, to_rate: f64) -> f64 {
    let base_amount = amount / from_rate;
    base_amount * to_rate
}

/// Direct from→to rate derived from two base-relative rates.
pub fn effective_rate(from_rate: f64, to_rate: f64) -> f64 {
    to_rate / from_rate
}

pub fn format_amount(amount: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, amount)
}

/// `"€92.00"` for supported codes, `"XYZ 92.00"` otherwise.
pub fn format_currency_display(amount: f64, code: &str) -> String {
    let formatted = format_amount(amount, DEFAULT_DECIMALS);
    match currency_by_code(code) {
        Some(currency) => format!("{}{}", currency.symbol, formatted),
        None => format!("{} {}", code, formatted),
    }
}

pub fn currency_symbol(code: &str) -> &str {
    currency_by_code(code).map(|c| c.symbol).unwrap_or(code)
}
