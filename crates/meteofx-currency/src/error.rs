//! Currency-specific error types.

use meteofx_core::{AppError, NetworkError};
use thiserror::Error;

/// Rejected amount input. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Please enter an amount")]
    Empty,

    #[error("Please enter a valid number")]
    NotANumber,

    #[error("Amount must be greater than zero")]
    NotPositive,

    #[error("Amount is too large")]
    TooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyCodeError {
    #[error("Invalid currency code format")]
    InvalidFormat,

    #[error("Unsupported currency code: {0}")]
    Unsupported(String),
}

/// Why a rate payload failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatesRejection {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response has no string `base`")]
    MissingBase,

    #[error("response has no `rates` object")]
    MissingRates,

    #[error("response contains no valid rates")]
    NoValidRates,
}

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("{source_name} responded with status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Unexpected payload from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Invalid API response structure: {0}")]
    Rejected(#[from] RatesRejection),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl RatesError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.user_message(),
            _ => "Failed to fetch exchange rates",
        }
    }
}

impl From<RatesError> for AppError {
    fn from(err: RatesError) -> Self {
        match err {
            RatesError::Network(e) => AppError::Network(e),
            other => AppError::Rates(other.to_string()),
        }
    }
}
