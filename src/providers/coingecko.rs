use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::core::currency::{CRYPTO_ASSETS, CRYPTO_QUOTE_FIATS, CurrencyCode};
use crate::core::provider::CryptoRateProvider;
use crate::core::rates::CryptoRateTable;
use crate::providers::USER_AGENT;

/// Crypto prices from CoinGecko's simple price endpoint, fetched in one batch.
pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
        }
    }

    fn ids() -> String {
        CRYPTO_ASSETS
            .iter()
            .map(|(_, id)| *id)
            .collect::<Vec<_>>()
            .join(",")
    }

    async fn request(&self) -> anyhow::Result<SimplePriceResponse> {
        let url = format!(
            "{}?ids={}&vs_currencies={}",
            self.base_url,
            Self::ids(),
            CRYPTO_QUOTE_FIATS.join(",")
        );
        debug!("Requesting crypto prices from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Provider id -> fiat code -> price
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

fn into_table(mut data: SimplePriceResponse) -> CryptoRateTable {
    let mut table = CryptoRateTable::new();
    for (symbol, id) in CRYPTO_ASSETS {
        let Some(quotes) = data.remove(id) else {
            debug!("No prices returned for {symbol}");
            continue;
        };
        match symbol.parse::<CurrencyCode>() {
            Ok(symbol) => table.insert(symbol, quotes),
            Err(e) => warn!("Skipping crypto symbol {symbol}: {e}"),
        }
    }
    table
}

#[async_trait]
impl CryptoRateProvider for CoinGeckoProvider {
    #[instrument(name = "CryptoRateFetch", skip(self))]
    async fn fetch_crypto_rates(&self) -> Option<CryptoRateTable> {
        match self.request().await {
            Ok(data) => {
                let table = into_table(data);
                debug!(symbols = table.len(), "Crypto prices received");
                Some(table)
            }
            Err(e) => {
                warn!(error = %e, "Crypto price fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_successful_batched_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "bitcoin": { "usd": 50000, "eur": 46000 },
            "ethereum": { "usd": 2500.5 },
            "dogecoin": {},
            "unlisted-coin": { "usd": 1 }
        }"#;

        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param(
                "ids",
                "bitcoin,ethereum,tether,binancecoin,solana,ripple,cardano,dogecoin,tron,litecoin",
            ))
            .and(query_param(
                "vs_currencies",
                "usd,eur,gbp,inr,jpy,cad,aud,chf,cny,krw,aed,sgd,nzd,mxn,brl,zar,hkd,sek,nok,dkk",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CoinGeckoProvider::new(&format!("{}/simple/price", mock_server.uri()));
        let table = provider.fetch_crypto_rates().await.expect("expected a table");

        assert_eq!(table.len(), 2);
        assert_eq!(table.price(&code("BTC"), &code("EUR")), Some(46000.0));
        assert_eq!(table.price(&code("ETH"), &code("USD")), Some(2500.5));
        assert!(table.quotes(&code("DOGE")).is_none());
    }

    #[tokio::test]
    async fn test_server_error_yields_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = CoinGeckoProvider::new(&mock_server.uri());
        assert!(provider.fetch_crypto_rates().await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_yields_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&mock_server)
            .await;

        let provider = CoinGeckoProvider::new(&mock_server.uri());
        assert!(provider.fetch_crypto_rates().await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_yields_none() {
        let provider = CoinGeckoProvider::new("http://127.0.0.1:1/simple/price");
        assert!(provider.fetch_crypto_rates().await.is_none());
    }
}
