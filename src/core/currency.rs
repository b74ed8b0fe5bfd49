//! Currency codes and fiat/crypto classification

use crate::core::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Crypto symbols the converter knows about, paired with their CoinGecko ids.
pub const CRYPTO_ASSETS: [(&str, &str); 10] = [
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("BNB", "binancecoin"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("TRX", "tron"),
    ("LTC", "litecoin"),
];

/// Fiat currencies crypto prices are quoted in. Smaller than the fiat provider's set.
pub const CRYPTO_QUOTE_FIATS: [&str; 20] = [
    "usd", "eur", "gbp", "inr", "jpy", "cad", "aud", "chf", "cny", "krw", "aed", "sgd", "nzd",
    "mxn", "brl", "zar", "hkd", "sek", "nok", "dkk",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> CurrencyKind {
        if CRYPTO_ASSETS.iter().any(|(symbol, _)| *symbol == self.0) {
            CurrencyKind::Crypto
        } else {
            CurrencyKind::Fiat
        }
    }

    pub fn is_crypto(&self) -> bool {
        self.kind() == CurrencyKind::Crypto
    }

    /// Key used for this code inside a crypto price map.
    pub fn quote_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// CoinGecko id for a crypto symbol, `None` for fiat codes.
    pub fn provider_id(&self) -> Option<&'static str> {
        CRYPTO_ASSETS
            .iter()
            .find(|(symbol, _)| *symbol == self.0)
            .map(|(_, id)| *id)
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        let valid_len = (2..=10).contains(&code.len());
        if !valid_len || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConvertError::InvalidInput(format!(
                "Invalid currency code: {s}"
            )));
        }
        Ok(CurrencyCode(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> String {
        code.0
    }
}
