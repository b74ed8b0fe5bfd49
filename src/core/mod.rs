//! Core conversion logic and abstractions

pub mod chart;
pub mod config;
pub mod currency;
pub mod error;
pub mod freshness;
pub mod log;
pub mod notice;
pub mod provider;
pub mod rates;
pub mod resolver;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCode, CurrencyKind};
pub use error::{ConvertError, FetchError, RateUnavailable};
pub use provider::{CryptoRateProvider, FiatRateProvider};
pub use rates::{CryptoRateTable, FiatRateTable, RateSnapshot};
pub use resolver::{ConversionRequest, ConversionResult, PairKind, resolve};
