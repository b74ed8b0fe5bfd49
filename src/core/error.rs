//! Error types for rate fetching and conversion

use crate::core::currency::CurrencyCode;
use thiserror::Error;

/// Failure talking to the fiat rate provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Upstream(u16),

    #[error("Failed to parse rate response: {0}")]
    Decode(String),
}

/// A rate lookup miss for a specific pair. Expected and recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateUnavailable {
    #[error("Crypto rate not available")]
    CryptoRate,

    #[error("Conversion to {0} not available")]
    ConversionTo(CurrencyCode),

    #[error("Conversion from {0} not available")]
    ConversionFrom(CurrencyCode),

    #[error("Exchange rate not available for selected currency")]
    ExchangeRate,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    RateUnavailable(#[from] RateUnavailable),
}

impl ConvertError {
    /// Message shown to the user. Fetch failures collapse into a generic retry hint.
    pub fn user_message(&self) -> String {
        match self {
            ConvertError::InvalidInput(message) => message.clone(),
            ConvertError::Fetch(_) => {
                "Failed to fetch exchange rates. Please try again.".to_string()
            }
            ConvertError::RateUnavailable(reason) => reason.to_string(),
        }
    }
}
