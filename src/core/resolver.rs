//! Pair classification and rate resolution against a [`RateSnapshot`]

use crate::core::currency::{CurrencyCode, CurrencyKind};
use crate::core::error::{ConvertError, RateUnavailable};
use crate::core::rates::RateSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    source: CurrencyCode,
    target: CurrencyCode,
    amount: f64,
}

impl ConversionRequest {
    /// Fails with `InvalidInput` unless `amount` is finite and positive.
    pub fn new(
        source: CurrencyCode,
        target: CurrencyCode,
        amount: f64,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            source,
            target,
            amount: check_amount(amount)?,
        })
    }

    /// Validates the amount before looking at the codes.
    pub fn parse(source: &str, target: &str, amount: &str) -> Result<Self, ConvertError> {
        let amount = parse_amount(amount)?;
        Self::new(source.parse()?, target.parse()?, amount)
    }

    pub fn source(&self) -> &CurrencyCode {
        &self.source
    }

    pub fn target(&self) -> &CurrencyCode {
        &self.target
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

fn invalid_amount() -> ConvertError {
    ConvertError::InvalidInput("Please enter a valid amount".to_string())
}

fn check_amount(amount: f64) -> Result<f64, ConvertError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(invalid_amount())
    }
}

pub fn parse_amount(text: &str) -> Result<f64, ConvertError> {
    let amount = text.trim().parse::<f64>().map_err(|_| invalid_amount())?;
    check_amount(amount)
}

/// The displayed rate always reads source to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDirection {
    SourceToTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub source: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: f64,
    pub rate: f64,
    /// `amount * rate`, unrounded
    pub converted_amount: f64,
    pub display_amount: String,
    pub display_rate: String,
    pub direction: RateDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    Same,
    FiatToFiat,
    CryptoToCrypto,
    CryptoToFiat,
    FiatToCrypto,
}

impl PairKind {
    pub fn classify(source: &CurrencyCode, target: &CurrencyCode) -> Self {
        if source == target {
            return PairKind::Same;
        }
        match (source.kind(), target.kind()) {
            (CurrencyKind::Fiat, CurrencyKind::Fiat) => PairKind::FiatToFiat,
            (CurrencyKind::Crypto, CurrencyKind::Crypto) => PairKind::CryptoToCrypto,
            (CurrencyKind::Crypto, CurrencyKind::Fiat) => PairKind::CryptoToFiat,
            (CurrencyKind::Fiat, CurrencyKind::Crypto) => PairKind::FiatToCrypto,
        }
    }
}

fn fiat_to_fiat(target: &CurrencyCode, snapshot: &RateSnapshot) -> Result<f64, RateUnavailable> {
    snapshot
        .fiat_rate(target)
        .ok_or(RateUnavailable::ExchangeRate)
}

fn crypto_to_crypto(
    source: &CurrencyCode,
    target: &CurrencyCode,
    snapshot: &RateSnapshot,
) -> Result<f64, RateUnavailable> {
    let crypto = snapshot.crypto();
    let usd = |symbol: &CurrencyCode| {
        crypto
            .quotes(symbol)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
    };
    match (usd(source), usd(target)) {
        (Some(from_usd), Some(to_usd)) => Ok(from_usd / to_usd),
        _ => Err(RateUnavailable::CryptoRate),
    }
}

fn crypto_to_fiat(
    source: &CurrencyCode,
    target: &CurrencyCode,
    snapshot: &RateSnapshot,
) -> Result<f64, RateUnavailable> {
    let quotes = snapshot
        .crypto()
        .quotes(source)
        .ok_or(RateUnavailable::CryptoRate)?;
    quotes
        .get(&target.quote_key())
        .copied()
        .ok_or_else(|| RateUnavailable::ConversionTo(target.clone()))
}

fn fiat_to_crypto(
    source: &CurrencyCode,
    target: &CurrencyCode,
    snapshot: &RateSnapshot,
) -> Result<f64, RateUnavailable> {
    let quotes = snapshot
        .crypto()
        .quotes(target)
        .ok_or(RateUnavailable::CryptoRate)?;
    quotes
        .get(&source.quote_key())
        .map(|price| 1.0 / price)
        .ok_or_else(|| RateUnavailable::ConversionFrom(source.clone()))
}

/// Scalar rate for one unit of `source` in `target`.
pub fn quote_rate(
    source: &CurrencyCode,
    target: &CurrencyCode,
    snapshot: &RateSnapshot,
) -> Result<f64, RateUnavailable> {
    match PairKind::classify(source, target) {
        PairKind::Same => Ok(1.0),
        PairKind::FiatToFiat => fiat_to_fiat(target, snapshot),
        PairKind::CryptoToCrypto => crypto_to_crypto(source, target, snapshot),
        PairKind::CryptoToFiat => crypto_to_fiat(source, target, snapshot),
        PairKind::FiatToCrypto => fiat_to_crypto(source, target, snapshot),
    }
}

pub fn format_amount(amount: f64, target: &CurrencyCode) -> String {
    if target.is_crypto() {
        format!("{amount:.8}")
    } else {
        format!("{amount:.2}")
    }
}

pub fn format_rate(source: &CurrencyCode, target: &CurrencyCode, rate: f64) -> String {
    if source.is_crypto() || target.is_crypto() {
        format!("1 {source} = {rate:.8} {target}")
    } else {
        format!("1 {source} = {rate:.4} {target}")
    }
}

/// Converts `request.amount` using the rates in `snapshot`. Pure.
pub fn resolve(
    request: &ConversionRequest,
    snapshot: &RateSnapshot,
) -> Result<ConversionResult, RateUnavailable> {
    let ConversionRequest {
        source,
        target,
        amount,
    } = request;

    if PairKind::classify(source, target) == PairKind::Same {
        return Ok(ConversionResult {
            source: source.clone(),
            target: target.clone(),
            amount: *amount,
            rate: 1.0,
            converted_amount: *amount,
            display_amount: format!("{amount:.2}"),
            display_rate: "1.0000".to_string(),
            direction: RateDirection::SourceToTarget,
        });
    }

    let rate = quote_rate(source, target, snapshot)?;
    let converted_amount = amount * rate;

    Ok(ConversionResult {
        source: source.clone(),
        target: target.clone(),
        amount: *amount,
        rate,
        converted_amount,
        display_amount: format_amount(converted_amount, target),
        display_rate: format_rate(source, target, rate),
        direction: RateDirection::SourceToTarget,
    })
}
