use super::{chart, ui};
use crate::converter::Converter;
use crate::core::chart::ChartPeriod;
use crate::core::provider::{CryptoRateProvider, FiatRateProvider};
use crate::core::resolver::ConversionResult;
use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::debug;

impl ConversionResult {
    pub fn display(&self) -> String {
        let amount = if self.source.is_crypto() {
            format!("{}", self.amount)
        } else {
            format!("{:.2}", self.amount)
        };
        format!(
            "{} {} = {} {}\n{}",
            amount,
            self.source,
            ui::style_text(&self.display_amount, ui::StyleType::Value),
            ui::style_text(self.target.as_str(), ui::StyleType::Label),
            ui::style_text(&self.display_rate, ui::StyleType::Subtle),
        )
    }
}

/// One-shot conversion, optionally followed by a chart.
pub async fn run<F, C>(
    converter: &mut Converter<F, C>,
    amount: &str,
    from: &str,
    to: &str,
    chart_period: Option<ChartPeriod>,
) -> Result<()>
where
    F: FiatRateProvider,
    C: CryptoRateProvider,
{
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let result = converter.convert(from, to, amount).await;
    spinner.finish_and_clear();

    let result = result.map_err(|e| {
        debug!(error = ?e, "Conversion failed");
        anyhow!(e.user_message())
    })?;

    println!("{}", result.display());
    if let Some(line) = ui::last_updated_line(converter.last_updated()) {
        println!("{}", ui::style_text(&line, ui::StyleType::Subtle));
    }

    if let Some(period) = chart_period {
        let today = Local::now().date_naive();
        let series = converter.chart_series(
            &result.source,
            &result.target,
            period,
            today,
            &mut rand::thread_rng(),
        );
        if let Some(points) = series {
            println!();
            println!(
                "{}",
                chart::render_table(&result.source, &result.target, period, &points)
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::rates::RateSnapshot;
    use crate::core::resolver::{ConversionRequest, resolve};

    #[test]
    fn test_display_contains_amounts_and_rate() {
        let request = ConversionRequest::parse("USD", "USD", "5").unwrap();
        let result = resolve(&request, &RateSnapshot::new()).unwrap();
        let output = result.display();

        assert!(output.contains("5.00 USD"));
        assert!(output.contains("1.0000"));
    }
}
