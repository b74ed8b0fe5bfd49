//! Rate provider abstractions

use crate::core::currency::CurrencyCode;
use crate::core::error::FetchError;
use crate::core::rates::{CryptoRateTable, FiatRateTable};
use async_trait::async_trait;

#[async_trait]
pub trait FiatRateProvider: Send + Sync {
    /// Fetches every rate the provider knows, expressed against `base`.
    async fn fetch_fiat_rates(&self, base: &CurrencyCode) -> Result<FiatRateTable, FetchError>;
}

#[async_trait]
pub trait CryptoRateProvider: Send + Sync {
    /// Fetches prices for the supported crypto symbols. Failures yield `None`.
    async fn fetch_crypto_rates(&self) -> Option<CryptoRateTable>;
}
