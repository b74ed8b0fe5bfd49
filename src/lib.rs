pub mod cli;
pub mod converter;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::converter::Converter;
use crate::core::chart::ChartPeriod;
use crate::providers::{CoinGeckoProvider, ExchangeRateApiProvider};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
        chart: Option<ChartPeriod>,
    },
    Rates {
        base: Option<String>,
    },
    Interactive,
}

pub type AppConverter = Converter<ExchangeRateApiProvider, CoinGeckoProvider>;

pub fn build_converter(config: &config::AppConfig) -> AppConverter {
    let fiat_provider = ExchangeRateApiProvider::new(config.providers.exchangerate_url());
    let crypto_provider = CoinGeckoProvider::new(config.providers.coingecko_url());
    Converter::new(fiat_provider, crypto_provider).with_crypto(config.crypto_enabled)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xfx starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut converter = build_converter(&config);

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            chart,
        } => {
            let from = from.as_deref().unwrap_or(&config.default_from);
            let to = to.as_deref().unwrap_or(&config.default_to);
            cli::convert::run(&mut converter, &amount, from, to, chart).await
        }
        AppCommand::Rates { base } => {
            let base = base.as_deref().unwrap_or(&config.default_from);
            cli::rates::run(&mut converter, base).await
        }
        AppCommand::Interactive => {
            cli::interactive::run(&mut converter, &config.default_from, &config.default_to).await
        }
    }
}
