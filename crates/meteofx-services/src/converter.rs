//! Converter session state: the amount and currency pair being edited.

use meteofx_currency::{
    currency::{is_amount_in_range, parse_amount},
    sanitize_currency_code, validate_amount, AmountError, ConversionRecord, CurrencyCodeError,
    ExchangeRateSet,
};
use thiserror::Error;

use crate::local::LocalStore;

pub const DEFAULT_AMOUNT: &str = "1";
pub const DEFAULT_FROM: &str = "USD";
pub const DEFAULT_TO: &str = "EUR";

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("{0}")]
    InvalidAmount(#[from] AmountError),

    #[error("No exchange rate available for {0}")]
    MissingRate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSession {
    amount: String,
    from: String,
    to: String,
}

impl Default for ConverterSession {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT.to_string(),
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
        }
    }
}

impl ConverterSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// Set the raw amount. Validation happens on [`convert`](Self::convert).
    pub fn set_amount(&mut self, raw: impl Into<String>) {
        self.amount = raw.into();
    }

    /// Choose the source currency. Picking the current target swaps the pair.
    pub fn set_from(&mut self, code: &str) -> Result<(), CurrencyCodeError> {
        let code = sanitize_currency_code(code)?;
        if code == self.to {
            self.to = std::mem::replace(&mut self.from, code);
        } else {
            self.from = code;
        }
        Ok(())
    }

    /// Choose the target currency. Picking the current source swaps the pair.
    pub fn set_to(&mut self, code: &str) -> Result<(), CurrencyCodeError> {
        let code = sanitize_currency_code(code)?;
        if code == self.from {
            self.from = std::mem::replace(&mut self.to, code);
        } else {
            self.to = code;
        }
        Ok(())
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Convert the current amount and record it in the history.
    ///
    /// A failed history write is logged; the conversion still succeeds.
    pub fn convert(
        &self,
        rates: &ExchangeRateSet,
        store: &LocalStore,
    ) -> Result<ConversionRecord, ConversionError> {
        let amount = validate_amount(&self.amount)?;

        let (result, rate) = rates.convert(amount, &self.from, &self.to).ok_or_else(|| {
            let missing = if rates.rate(&self.from).is_none() {
                &self.from
            } else {
                &self.to
            };
            ConversionError::MissingRate(missing.clone())
        })?;

        let record = ConversionRecord::new(&self.from, &self.to, amount, result, rate);
        if let Err(e) = store.save_conversion(record.clone()) {
            tracing::warn!("Conversion not saved to history: {}", e);
        }
        Ok(record)
    }

    /// Restore the inputs of a past conversion.
    pub fn load_from_history(&mut self, record: &ConversionRecord) {
        self.amount = record.amount.to_string();
        self.from = record.from.clone();
        self.to = record.to.clone();
    }

    /// Apply shareable `amount`/`from`/`to` parameters. Invalid values are
    /// logged and ignored.
    pub fn apply_query(&mut self, amount: Option<&str>, from: Option<&str>, to: Option<&str>) {
        if let Some(raw) = amount.filter(|s| !s.is_empty()) {
            match parse_amount(raw) {
                Some(value) if is_amount_in_range(value) => self.amount = raw.to_string(),
                _ => tracing::warn!("Invalid amount in query parameters: {}", raw),
            }
        }

        if let Some(raw) = from.filter(|s| !s.is_empty()) {
            match sanitize_currency_code(raw) {
                Ok(code) => self.from = code,
                Err(_) => tracing::warn!("Invalid from currency in query parameters: {}", raw),
            }
        }

        if let Some(raw) = to.filter(|s| !s.is_empty()) {
            match sanitize_currency_code(raw) {
                Ok(code) => self.to = code,
                Err(_) => tracing::warn!("Invalid to currency in query parameters: {}", raw),
            }
        }
    }

    /// Parse a `amount=..&from=..&to=..` query string into the session.
    pub fn apply_query_string(&mut self, query: &str) {
        let mut amount = None;
        let mut from = None;
        let mut to = None;
        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "amount" => amount = Some(value.into_owned()),
                "from" => from = Some(value.into_owned()),
                "to" => to = Some(value.into_owned()),
                _ => {}
            }
        }
        self.apply_query(amount.as_deref(), from.as_deref(), to.as_deref());
    }

    /// Shareable query string for the current inputs.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("amount", &self.amount)
            .append_pair("from", &self.from)
            .append_pair("to", &self.to)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::kv::MemoryStore;
    use meteofx_currency::validate_rates;
    use serde_json::json;

    fn rates() -> ExchangeRateSet {
        validate_rates(&json!({
            "base": "USD",
            "rates": { "USD": 1.0, "EUR": 0.92, "GBP": 0.79 }
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let session = ConverterSession::new();
        assert_eq!(session.amount(), "1");
        assert_eq!(session.from(), "USD");
        assert_eq!(session.to(), "EUR");
    }

    #[test]
    fn test_set_from_auto_swaps() {
        let mut session = ConverterSession::new();
        session.set_from("EUR").unwrap();
        assert_eq!((session.from(), session.to()), ("EUR", "USD"));

        session.set_to("eur").unwrap();
        assert_eq!((session.from(), session.to()), ("USD", "EUR"));

        session.set_to("GBP").unwrap();
        assert_eq!((session.from(), session.to()), ("USD", "GBP"));

        assert!(session.set_from("XYZ").is_err());
        assert_eq!(session.from(), "USD");
    }

    #[test]
    fn test_swap() {
        let mut session = ConverterSession::new();
        session.swap();
        assert_eq!((session.from(), session.to()), ("EUR", "USD"));
    }

    #[test]
    fn test_convert_saves_history() {
        let store = LocalStore::new(MemoryStore::new());
        let mut session = ConverterSession::new();
        session.set_amount("100");

        let record = session.convert(&rates(), &store).unwrap();
        assert!((record.result - 92.0).abs() < 1e-9);
        assert!((record.rate - 0.92).abs() < 1e-12);
        assert_eq!(store.conversion_history(), vec![record]);
    }

    #[test]
    fn test_convert_invalid_amount() {
        let store = LocalStore::new(MemoryStore::new());
        let mut session = ConverterSession::new();
        session.set_amount("-5");

        let err = session.convert(&rates(), &store).unwrap_err();
        assert_eq!(err.to_string(), "Amount must be greater than zero");
        assert!(store.conversion_history().is_empty());
    }

    #[test]
    fn test_convert_missing_rate() {
        let mut session = ConverterSession::new();
        session.set_to("JPY").unwrap();

        let err = session.convert(&rates(), &LocalStore::detached()).unwrap_err();
        assert!(matches!(err, ConversionError::MissingRate(ref c) if c == "JPY"));
    }

    #[test]
    fn test_load_from_history() {
        let mut session = ConverterSession::new();
        session.load_from_history(&ConversionRecord::new("GBP", "JPY", 250.0, 48_000.0, 192.0));
        assert_eq!(session.amount(), "250");
        assert_eq!((session.from(), session.to()), ("GBP", "JPY"));
    }

    #[test]
    fn test_apply_query_ignores_invalid() {
        let mut session = ConverterSession::new();
        session.apply_query(Some("0"), Some("bitcoin"), Some("gbp"));
        assert_eq!(session.amount(), "1");
        assert_eq!(session.from(), "USD");
        assert_eq!(session.to(), "GBP");

        session.apply_query_string("?amount=250&from=eur&to=jpy");
        assert_eq!(session.amount(), "250");
        assert_eq!((session.from(), session.to()), ("EUR", "JPY"));
        assert_eq!(session.to_query_string(), "amount=250&from=EUR&to=JPY");
    }
}
