use super::ui;
use crate::core::chart::{ChartPeriod, ChartPoint};
use crate::core::currency::CurrencyCode;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: usize = 30;

fn bounds(points: &[ChartPoint]) -> Option<(f64, f64)> {
    let first = points.first()?.rate;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (lo.min(p.rate), hi.max(p.rate))
    }))
}

/// Position of `rate` within `[lo, hi]` scaled to `0..=max`.
fn scale(rate: f64, lo: f64, hi: f64, max: usize) -> usize {
    if hi <= lo {
        return max / 2;
    }
    let ratio = (rate - lo) / (hi - lo);
    ((ratio * max as f64).round() as usize).min(max)
}

/// Single-line sparkline of the series.
pub fn sparkline(points: &[ChartPoint]) -> String {
    let Some((lo, hi)) = bounds(points) else {
        return String::new();
    };
    points
        .iter()
        .map(|p| SPARK_LEVELS[scale(p.rate, lo, hi, SPARK_LEVELS.len() - 1)])
        .collect()
}

/// Table of the series with a bar per day.
pub fn render_table(
    source: &CurrencyCode,
    target: &CurrencyCode,
    period: ChartPeriod,
    points: &[ChartPoint],
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell(""),
    ]);

    if let Some((lo, hi)) = bounds(points) {
        for point in points {
            let bar = "█".repeat(scale(point.rate, lo, hi, BAR_WIDTH).max(1));
            table.add_row(vec![
                comfy_table::Cell::new(&point.label),
                comfy_table::Cell::new(point.date.format("%Y-%m-%d")),
                ui::number_cell(format!("{:.4}", point.rate)),
                comfy_table::Cell::new(bar).fg(comfy_table::Color::Blue),
            ]);
        }
    }

    format!(
        "{} {}\n{}\n{}",
        ui::style_text(&format!("{source} to {target}"), ui::StyleType::Title),
        ui::style_text(&format!("({period}, simulated)"), ui::StyleType::Subtle),
        table,
        ui::style_text(
            "Historical values are simulated around the current rate",
            ui::StyleType::Subtle
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn points(rates: &[f64]) -> Vec<ChartPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        rates
            .iter()
            .enumerate()
            .map(|(i, rate)| ChartPoint {
                date: start + chrono::Duration::days(i as i64),
                label: format!("D{i}"),
                rate: *rate,
            })
            .collect()
    }

    #[test]
    fn test_sparkline_spans_levels() {
        assert_eq!(sparkline(&points(&[1.0, 1.5, 2.0])), "▁▅█");
        assert_eq!(sparkline(&points(&[3.0, 3.0])), "▄▄");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_render_table_lists_every_point() {
        let source: CurrencyCode = "USD".parse().unwrap();
        let target: CurrencyCode = "EUR".parse().unwrap();
        let output = render_table(&source, &target, ChartPeriod::Week, &points(&[0.91, 0.93]));

        assert!(output.contains("USD to EUR"));
        assert!(output.contains("0.9100"));
        assert!(output.contains("0.9300"));
        assert!(output.contains("2024-10-02"));
    }
}
