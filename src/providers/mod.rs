pub mod coingecko;
pub mod exchangerate_api;

pub use coingecko::CoinGeckoProvider;
pub use exchangerate_api::ExchangeRateApiProvider;

pub(crate) const USER_AGENT: &str = concat!("xfx/", env!("CARGO_PKG_VERSION"));
