use super::ui;
use crate::converter::Converter;
use crate::core::currency::{CRYPTO_ASSETS, CurrencyCode};
use crate::core::provider::{CryptoRateProvider, FiatRateProvider};
use crate::core::rates::RateSnapshot;
use anyhow::{Result, anyhow};
use comfy_table::Cell;

/// Table of every fiat rate against the snapshot's base.
pub fn fiat_rates_table(snapshot: &RateSnapshot) -> Option<String> {
    let fiat = snapshot.fiat()?;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {}", fiat.base())),
    ]);
    for (code, rate) in fiat.sorted() {
        table.add_row(vec![Cell::new(code), ui::number_cell(format!("{rate:.4}"))]);
    }
    Some(table.to_string())
}

/// Price of each supported crypto asset in `quote`.
pub fn crypto_prices_table(snapshot: &RateSnapshot, quote: &CurrencyCode) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset"),
        ui::header_cell(&format!("Price ({quote})")),
    ]);
    for (symbol, _) in CRYPTO_ASSETS {
        let price = symbol
            .parse::<CurrencyCode>()
            .ok()
            .and_then(|symbol| snapshot.crypto().price(&symbol, quote));
        let cell = match price {
            Some(price) => ui::number_cell(format!("{price:.2}")),
            None => ui::na_cell(),
        };
        table.add_row(vec![Cell::new(symbol), cell]);
    }
    table.to_string()
}

pub async fn run<F, C>(converter: &mut Converter<F, C>, base: &str) -> Result<()>
where
    F: FiatRateProvider,
    C: CryptoRateProvider,
{
    let base: CurrencyCode = base.parse().map_err(|e| anyhow!("{e}"))?;
    if base.is_crypto() {
        anyhow::bail!("Rates are listed against a fiat base, got {base}");
    }

    let spinner = ui::new_spinner("Fetching exchange rates...");
    let fiat = converter.refresh_fiat(&base).await;
    if converter.crypto_enabled() {
        converter.refresh_crypto().await;
    }
    spinner.finish_and_clear();
    fiat.map_err(|e| anyhow!("Failed to fetch exchange rates: {e}"))?;

    let snapshot = converter.snapshot();
    if let Some(table) = fiat_rates_table(snapshot) {
        println!(
            "{}\n\n{}",
            ui::style_text(&format!("Exchange rates for {base}"), ui::StyleType::Title),
            table
        );
    }
    if converter.crypto_enabled() {
        println!(
            "\n{}\n\n{}",
            ui::style_text("Crypto prices", ui::StyleType::Title),
            crypto_prices_table(snapshot, &base)
        );
    }
    if let Some(line) = ui::last_updated_line(converter.last_updated()) {
        println!("\n{}", ui::style_text(&line, ui::StyleType::Subtle));
    }
    Ok(())
}
