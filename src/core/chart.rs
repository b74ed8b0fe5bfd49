//! Simulated rate history for the chart view

use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::fmt::Display;
use std::str::FromStr;

/// Maximum relative swing applied to each simulated point.
const MAX_VARIATION: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartPeriod {
    #[default]
    Week,
    Month,
    Quarter,
}

impl ChartPeriod {
    pub fn days(&self) -> u32 {
        match self {
            ChartPeriod::Week => 7,
            ChartPeriod::Month => 30,
            ChartPeriod::Quarter => 90,
        }
    }
}

impl Display for ChartPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}D", self.days())
    }
}

impl FromStr for ChartPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().trim_end_matches('D') {
            "7" => Ok(ChartPeriod::Week),
            "30" => Ok(ChartPeriod::Month),
            "90" => Ok(ChartPeriod::Quarter),
            _ => Err(anyhow::anyhow!("Invalid chart period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub label: String,
    pub rate: f64,
}

fn label_for(date: NaiveDate, period: ChartPeriod) -> String {
    if period.days() <= 7 {
        date.format("%a").to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}

/// One point per day ending at `today`, oldest first, each within ±3% of `rate`.
pub fn synthetic_series<R: Rng>(
    rate: f64,
    period: ChartPeriod,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<ChartPoint> {
    (0..period.days())
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(i64::from(days_back));
            let variation = rng.gen_range(-MAX_VARIATION..MAX_VARIATION);
            ChartPoint {
                date,
                label: label_for(date, period),
                rate: rate * (1.0 + variation),
            }
        })
        .collect()
}
