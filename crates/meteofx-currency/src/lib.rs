//! Currency conversion for meteofx
//!
//! Holds the supported currency list, amount/code validation, the
//! base-relative conversion arithmetic and the exchange-rate fetch pipeline
//! (ordered sources, transform, validation, mock fallback).

pub mod currency;
pub mod error;
pub mod fetcher;
pub mod mock;
pub mod rates;
pub mod record;

pub use currency::{
    convert, currency_by_code, effective_rate, is_currency_code, is_supported,
    sanitize_currency_code, validate_amount, Currency, CURRENCIES,
};
pub use error::{AmountError, CurrencyCodeError, RatesError, RatesRejection};
pub use fetcher::{FetchOutcome, RateFetcher, RateOrigin, RateSource};
pub use mock::mock_rates;
pub use rates::{validate_rates, ExchangeRateSet};
pub use record::ConversionRecord;
