//! Fetch-then-resolve orchestration around a single [`RateSnapshot`]

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join;
use rand::Rng;
use tracing::{debug, warn};

use crate::core::chart::{ChartPeriod, ChartPoint, synthetic_series};
use crate::core::currency::CurrencyCode;
use crate::core::error::{ConvertError, FetchError, RateUnavailable};
use crate::core::freshness::RefreshPlan;
use crate::core::provider::{CryptoRateProvider, FiatRateProvider};
use crate::core::rates::RateSnapshot;
use crate::core::resolver::{
    ConversionRequest, ConversionResult, PairKind, format_rate, quote_rate, resolve,
};

pub struct Converter<F, C> {
    fiat_provider: F,
    crypto_provider: C,
    snapshot: RateSnapshot,
    crypto_enabled: bool,
}

impl<F, C> Converter<F, C>
where
    F: FiatRateProvider,
    C: CryptoRateProvider,
{
    pub fn new(fiat_provider: F, crypto_provider: C) -> Self {
        Self {
            fiat_provider,
            crypto_provider,
            snapshot: RateSnapshot::new(),
            crypto_enabled: true,
        }
    }

    /// Fiat-only mode rejects crypto codes and never calls the crypto provider.
    pub fn with_crypto(mut self, enabled: bool) -> Self {
        self.crypto_enabled = enabled;
        self
    }

    pub fn crypto_enabled(&self) -> bool {
        self.crypto_enabled
    }

    pub fn snapshot(&self) -> &RateSnapshot {
        &self.snapshot
    }

    /// Time of the last successful fiat fetch.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot.last_fetch()
    }

    /// Warms both tables concurrently.
    pub async fn load_initial(&mut self, base: &CurrencyCode) -> Result<(), FetchError> {
        if !self.crypto_enabled {
            return self.refresh_fiat(base).await;
        }

        let (fiat, crypto) = join(
            self.fiat_provider.fetch_fiat_rates(base),
            self.crypto_provider.fetch_crypto_rates(),
        )
        .await;

        let now = Utc::now();
        if let Some(table) = crypto {
            self.snapshot.replace_crypto(table, now);
        }
        let table = fiat?;
        self.snapshot.replace_fiat(table, now);
        Ok(())
    }

    pub async fn refresh_fiat(&mut self, base: &CurrencyCode) -> Result<(), FetchError> {
        let table = self.fiat_provider.fetch_fiat_rates(base).await?;
        self.snapshot.replace_fiat(table, Utc::now());
        Ok(())
    }

    /// Returns false when the provider failed; the previous crypto table is kept.
    pub async fn refresh_crypto(&mut self) -> bool {
        match self.crypto_provider.fetch_crypto_rates().await {
            Some(table) => {
                self.snapshot.replace_crypto(table, Utc::now());
                true
            }
            None => false,
        }
    }

    fn check_enabled(&self, code: &CurrencyCode) -> Result<(), ConvertError> {
        if !self.crypto_enabled && code.is_crypto() {
            return Err(ConvertError::InvalidInput(
                "Crypto assets are disabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates input, refreshes whichever tables the pair needs, then resolves.
    pub async fn convert(
        &mut self,
        source: &str,
        target: &str,
        amount: &str,
    ) -> Result<ConversionResult, ConvertError> {
        let request = ConversionRequest::parse(source, target, amount)?;
        let (source, target) = (request.source(), request.target());
        self.check_enabled(source)?;
        self.check_enabled(target)?;

        let plan = RefreshPlan::for_pair(&self.snapshot, source, target, Utc::now());
        debug!(?plan, %source, %target, "Refresh plan");

        if plan.crypto && !self.refresh_crypto().await {
            debug!("Continuing with previous crypto prices");
        }
        if plan.fiat {
            self.refresh_fiat(source).await?;
        }

        if PairKind::classify(source, target) == PairKind::FiatToFiat {
            if let Some(table) = self.snapshot.fiat() {
                if table.base() != source {
                    warn!(
                        base = %table.base(),
                        %source,
                        "Resolving against rates fetched for a different base"
                    );
                }
            }
        }

        Ok(resolve(&request, &self.snapshot)?)
    }

    pub fn quote(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
    ) -> Result<f64, RateUnavailable> {
        quote_rate(source, target, &self.snapshot)
    }

    /// Rate line for a fiat pair from cached rates, without an amount or a fetch.
    pub fn preview_rate(&self, source: &CurrencyCode, target: &CurrencyCode) -> Option<String> {
        if PairKind::classify(source, target) != PairKind::FiatToFiat {
            return None;
        }
        self.snapshot
            .fiat_rate(target)
            .map(|rate| format_rate(source, target, rate))
    }

    /// Simulated history around the current rate, `None` when the rate is unknown.
    pub fn chart_series<R: Rng>(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
        period: ChartPeriod,
        today: NaiveDate,
        rng: &mut R,
    ) -> Option<Vec<ChartPoint>> {
        match self.quote(source, target) {
            Ok(rate) => Some(synthetic_series(rate, period, today, rng)),
            Err(reason) => {
                debug!(%reason, "Skipping chart");
                None
            }
        }
    }
}
