//! Rate tables and the in-memory snapshot the resolver reads from

use crate::core::currency::CurrencyCode;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

fn is_usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Units of each currency per one unit of `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct FiatRateTable {
    base: CurrencyCode,
    rates: HashMap<CurrencyCode, f64>,
}

impl FiatRateTable {
    /// Builds a table from raw provider output. Unparseable codes and
    /// non-positive rates are dropped.
    pub fn from_raw(base: CurrencyCode, raw: HashMap<String, f64>) -> Self {
        let mut rates = HashMap::with_capacity(raw.len());
        for (code, rate) in raw {
            match code.parse::<CurrencyCode>() {
                Ok(code) if is_usable(rate) => {
                    rates.insert(code, rate);
                }
                _ => debug!("Dropping fiat rate {code}={rate}"),
            }
        }
        Self { base, rates }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn get(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries sorted by code.
    pub fn sorted(&self) -> Vec<(&CurrencyCode, f64)> {
        let mut entries: Vec<_> = self.rates.iter().map(|(c, r)| (c, *r)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Price of one unit of each crypto symbol, keyed by lower-cased fiat code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CryptoRateTable {
    prices: HashMap<CurrencyCode, HashMap<String, f64>>,
}

impl CryptoRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a symbol's quotes. Symbols left with no usable quote are not stored.
    pub fn insert(&mut self, symbol: CurrencyCode, quotes: HashMap<String, f64>) {
        let quotes: HashMap<String, f64> = quotes
            .into_iter()
            .filter(|(_, price)| is_usable(*price))
            .map(|(fiat, price)| (fiat.to_lowercase(), price))
            .collect();
        if quotes.is_empty() {
            debug!("No usable quotes for {symbol}");
            return;
        }
        self.prices.insert(symbol, quotes);
    }

    pub fn quotes(&self, symbol: &CurrencyCode) -> Option<&HashMap<String, f64>> {
        self.prices.get(symbol)
    }

    /// Price of `symbol` in `fiat`, if both are known.
    pub fn price(&self, symbol: &CurrencyCode, fiat: &CurrencyCode) -> Option<f64> {
        self.quotes(symbol)
            .and_then(|quotes| quotes.get(&fiat.quote_key()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// The most recent fiat and crypto tables. Each table is only ever replaced whole.
#[derive(Debug, Clone, Default)]
pub struct RateSnapshot {
    fiat: Option<FiatRateTable>,
    crypto: CryptoRateTable,
    last_fetch: Option<DateTime<Utc>>,
    crypto_fetched_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fiat(&self) -> Option<&FiatRateTable> {
        self.fiat.as_ref()
    }

    pub fn crypto(&self) -> &CryptoRateTable {
        &self.crypto
    }

    /// Time of the last successful fiat fetch.
    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch
    }

    pub fn crypto_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.crypto_fetched_at
    }

    pub fn fiat_rate(&self, code: &CurrencyCode) -> Option<f64> {
        self.fiat.as_ref().and_then(|table| table.get(code))
    }

    pub fn replace_fiat(&mut self, table: FiatRateTable, fetched_at: DateTime<Utc>) {
        self.fiat = Some(table);
        self.last_fetch = Some(fetched_at);
    }

    pub fn replace_crypto(&mut self, table: CryptoRateTable, fetched_at: DateTime<Utc>) {
        self.crypto = table;
        self.crypto_fetched_at = Some(fetched_at);
    }

    /// Snapshot with the given tables, for callers that build rates by hand.
    pub fn with_tables(
        fiat: Option<FiatRateTable>,
        crypto: CryptoRateTable,
        last_fetch: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            fiat,
            crypto,
            last_fetch,
            crypto_fetched_at: last_fetch,
        }
    }
}
