use std::fs;
use tracing::info;
use xfx::core::currency::CurrencyCode;
use xfx::core::error::{ConvertError, RateUnavailable};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const USD_RATES: &str = r#"{
        "base": "USD",
        "rates": { "USD": 1, "EUR": 0.92, "GBP": 0.79, "JPY": 150.25 }
    }"#;

    pub const CRYPTO_PRICES: &str = r#"{
        "bitcoin": { "usd": 50000, "eur": 46000 },
        "ethereum": { "usd": 2500, "eur": 2300 }
    }"#;

    pub async fn create_fiat_mock_server(base: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_crypto_mock_server(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn config_yaml(fiat: &MockServer, crypto: &MockServer, crypto_enabled: bool) -> String {
        format!(
            r#"
        providers:
          exchangerate:
            base_url: "{}/latest"
          coingecko:
            base_url: "{}/simple/price"
        default_from: "USD"
        default_to: "EUR"
        crypto_enabled: {}
    "#,
            fiat.uri(),
            crypto.uri(),
            crypto_enabled
        )
    }
}

fn code(s: &str) -> CurrencyCode {
    s.parse().unwrap()
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let fiat = test_utils::create_fiat_mock_server("USD", test_utils::USD_RATES).await;
    let crypto = test_utils::create_crypto_mock_server(
        wiremock::ResponseTemplate::new(200).set_body_string(test_utils::CRYPTO_PRICES),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    fs::write(config_path, test_utils::config_yaml(&fiat, &crypto, true))
        .expect("Failed to write config file");

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            amount: "100".to_string(),
            from: None,
            to: Some("BTC".to_string()),
            chart: Some(xfx::core::chart::ChartPeriod::Week),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );

    let result = xfx::run_command(
        xfx::AppCommand::Rates { base: None },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_unavailable_pair_reports_specific_message() {
    let fiat = test_utils::create_fiat_mock_server("USD", test_utils::USD_RATES).await;
    let crypto = test_utils::create_crypto_mock_server(
        wiremock::ResponseTemplate::new(200).set_body_string(test_utils::CRYPTO_PRICES),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        test_utils::config_yaml(&fiat, &crypto, true),
    )
    .expect("Failed to write config file");

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            amount: "1".to_string(),
            from: Some("BTC".to_string()),
            to: Some("TRY".to_string()),
            chart: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("BTC to TRY should not be available");
    assert_eq!(err.to_string(), "Conversion to TRY not available");
}

#[test_log::test(tokio::test)]
async fn test_converter_against_mock_providers() {
    let fiat = test_utils::create_fiat_mock_server("USD", test_utils::USD_RATES).await;
    let crypto = test_utils::create_crypto_mock_server(
        wiremock::ResponseTemplate::new(200).set_body_string(test_utils::CRYPTO_PRICES),
    )
    .await;
    let config: xfx::config::AppConfig =
        serde_yaml::from_str(&test_utils::config_yaml(&fiat, &crypto, true)).unwrap();
    let mut converter = xfx::build_converter(&config);

    let result = converter.convert("USD", "JPY", "3").await.unwrap();
    assert_eq!(result.converted_amount, 3.0 * 150.25);
    assert_eq!(result.display_amount, "450.75");
    assert_eq!(result.display_rate, "1 USD = 150.2500 JPY");

    let result = converter.convert("BTC", "ETH", "2").await.unwrap();
    assert_eq!(result.rate, 20.0);
    assert_eq!(result.display_amount, "40.00000000");

    let result = converter.convert("ETH", "EUR", "0.5").await.unwrap();
    assert_eq!(result.display_amount, "1150.00");
    info!(rate = %result.display_rate, "Crypto to fiat");

    let err = converter.convert("USD", "CHF", "1").await.unwrap_err();
    assert_eq!(
        err,
        ConvertError::RateUnavailable(RateUnavailable::ExchangeRate)
    );
}

#[test_log::test(tokio::test)]
async fn test_crypto_outage_is_reported_as_unavailable_rate() {
    let fiat = test_utils::create_fiat_mock_server("USD", test_utils::USD_RATES).await;
    let crypto =
        test_utils::create_crypto_mock_server(wiremock::ResponseTemplate::new(500)).await;
    let config: xfx::config::AppConfig =
        serde_yaml::from_str(&test_utils::config_yaml(&fiat, &crypto, true)).unwrap();
    let mut converter = xfx::build_converter(&config);

    let err = converter.convert("USD", "BTC", "10").await.unwrap_err();
    assert_eq!(err.user_message(), "Crypto rate not available");

    // Fiat conversions are unaffected
    let result = converter.convert("USD", "EUR", "10").await.unwrap();
    assert_eq!(result.display_amount, "9.20");
}

#[test_log::test(tokio::test)]
async fn test_fiat_outage_is_a_fetch_error() {
    let fiat = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(502))
        .mount(&fiat)
        .await;
    let crypto = test_utils::create_crypto_mock_server(
        wiremock::ResponseTemplate::new(200).set_body_string(test_utils::CRYPTO_PRICES),
    )
    .await;
    let config: xfx::config::AppConfig =
        serde_yaml::from_str(&test_utils::config_yaml(&fiat, &crypto, true)).unwrap();
    let mut converter = xfx::build_converter(&config);

    let err = converter.convert("USD", "EUR", "10").await.unwrap_err();
    assert!(matches!(err, ConvertError::Fetch(_)));
    assert_eq!(
        err.user_message(),
        "Failed to fetch exchange rates. Please try again."
    );

    // Crypto sources do not depend on the fiat provider
    let result = converter.convert("BTC", "USD", "1").await.unwrap();
    assert_eq!(result.display_amount, "50000.00");
}

#[test_log::test(tokio::test)]
async fn test_fiat_only_config_never_calls_crypto_provider() {
    let fiat = test_utils::create_fiat_mock_server("USD", test_utils::USD_RATES).await;
    let crypto = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&crypto)
        .await;

    let config: xfx::config::AppConfig =
        serde_yaml::from_str(&test_utils::config_yaml(&fiat, &crypto, false)).unwrap();
    let mut converter = xfx::build_converter(&config);

    converter.load_initial(&code("USD")).await.unwrap();
    let err = converter.convert("USD", "BTC", "1").await.unwrap_err();
    assert_eq!(err.user_message(), "Crypto assets are disabled");

    let result = converter.convert("USD", "GBP", "10").await.unwrap();
    assert_eq!(result.display_amount, "7.90");
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_via_run_command() {
    let config_dir = write_default_config();
    let config_path = config_dir.path().join("config.yaml");
    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            amount: "-3".to_string(),
            from: Some("USD".to_string()),
            to: Some("EUR".to_string()),
            chart: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Please enter a valid amount"
    );
}

fn write_default_config() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    xfx::cli::setup::setup_at_path(dir.path().join("config.yaml")).expect("setup failed");
    dir
}

#[test_log::test(tokio::test)]
#[ignore = "hits the real exchangerate-api.com endpoint"]
async fn test_real_fiat_rates_api() {
    use xfx::core::provider::FiatRateProvider;
    use xfx::providers::ExchangeRateApiProvider;

    let provider = ExchangeRateApiProvider::new(xfx::config::DEFAULT_EXCHANGERATE_URL);
    let table = provider
        .fetch_fiat_rates(&code("USD"))
        .await
        .expect("fiat rate request failed");

    info!(rates = table.len(), "Received fiat rates");
    assert!(table.get(&code("EUR")).is_some_and(|rate| rate > 0.0));
}
