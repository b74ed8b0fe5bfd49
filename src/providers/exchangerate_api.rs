use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyCode;
use crate::core::error::FetchError;
use crate::core::provider::FiatRateProvider;
use crate::core::rates::FiatRateTable;
use crate::providers::USER_AGENT;

/// Fiat rates from exchangerate-api.com (`GET {base_url}/{BASE}`).
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl FiatRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "FiatRateFetch", skip(self), fields(base = %base))]
    async fn fetch_fiat_rates(&self, base: &CurrencyCode) -> Result<FiatRateTable, FetchError> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("Requesting fiat rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("{e} for base: {base}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Upstream(response.status().as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Decode(format!("{base}: {e}")))?;

        let table = FiatRateTable::from_raw(base.clone(), data.rates);
        debug!(rates = table.len(), fetched_at = %Utc::now(), "Fiat rates received");
        Ok(table)
    }
}
