use super::{chart, ui};
use crate::converter::Converter;
use crate::core::chart::ChartPeriod;
use crate::core::currency::CurrencyCode;
use crate::core::notice::NoticeBoard;
use crate::core::provider::{CryptoRateProvider, FiatRateProvider};
use anyhow::Result;
use chrono::Local;
use std::io::Write;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  <amount> [FROM TO]   convert, optionally changing the pair
  from <CODE>          change the source currency
  to <CODE>            change the target currency
  swap                 swap source and target
  chart <7|30|90>      show the simulated rate chart
  help                 show this help
  quit                 exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Convert {
        amount: String,
        pair: Option<(String, String)>,
    },
    From(String),
    To(String),
    Swap,
    Chart(ChartPeriod),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        [] => return Ok(None),
        ["quit" | "exit" | "q"] => ShellCommand::Quit,
        ["help" | "?"] => ShellCommand::Help,
        ["swap"] => ShellCommand::Swap,
        ["from", code] => ShellCommand::From(code.to_string()),
        ["to", code] => ShellCommand::To(code.to_string()),
        ["chart"] => ShellCommand::Chart(ChartPeriod::default()),
        ["chart", period] => ShellCommand::Chart(period.parse().map_err(|e| format!("{e}"))?),
        [amount] => ShellCommand::Convert {
            amount: amount.to_string(),
            pair: None,
        },
        [amount, from, to] | [amount, from, "to", to] => ShellCommand::Convert {
            amount: amount.to_string(),
            pair: Some((from.to_string(), to.to_string())),
        },
        _ => return Err(format!("Unknown command: {line}")),
    };
    Ok(Some(command))
}

/// Selection and last output of the shell, mirroring the converter form.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    pub from: String,
    pub to: String,
    pub amount: Option<String>,
    pub converted: Option<String>,
    pub period: ChartPeriod,
}

impl ShellState {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            amount: None,
            converted: None,
            period: ChartPeriod::default(),
        }
    }

    /// Swaps the pair and moves the last converted amount into the amount field.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        std::mem::swap(&mut self.amount, &mut self.converted);
    }
}

struct Shell<'a, F, C> {
    converter: &'a mut Converter<F, C>,
    state: ShellState,
    notices: NoticeBoard,
}

impl<F, C> Shell<'_, F, C>
where
    F: FiatRateProvider,
    C: CryptoRateProvider,
{
    async fn convert(&mut self) {
        let Some(amount) = self.state.amount.clone() else {
            return;
        };
        let spinner = ui::new_spinner("Converting...");
        let result = self
            .converter
            .convert(&self.state.from, &self.state.to, &amount)
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(result) => {
                self.notices.clear();
                println!("{}", result.display());
                let series = self.converter.chart_series(
                    &result.source,
                    &result.target,
                    self.state.period,
                    Local::now().date_naive(),
                    &mut rand::thread_rng(),
                );
                if let Some(points) = series {
                    println!(
                        "{} {}",
                        ui::style_text(&self.state.period.to_string(), ui::StyleType::Subtle),
                        chart::sparkline(&points)
                    );
                }
                if let Some(line) = ui::last_updated_line(self.converter.last_updated()) {
                    println!("{}", ui::style_text(&line, ui::StyleType::Subtle));
                }
                self.state.converted = Some(result.display_amount);
            }
            Err(e) => {
                debug!(error = ?e, "Conversion failed");
                self.state.converted = None;
                self.notices.raise(e.user_message(), Instant::now());
            }
        }
    }

    fn preview_rate(&self) {
        let (Ok(from), Ok(to)) = (
            self.state.from.parse::<CurrencyCode>(),
            self.state.to.parse::<CurrencyCode>(),
        ) else {
            return;
        };
        if let Some(line) = self.converter.preview_rate(&from, &to) {
            println!("{}", ui::style_text(&line, ui::StyleType::Subtle));
        }
    }

    fn show_chart(&self, period: ChartPeriod) {
        let (Ok(from), Ok(to)) = (
            self.state.from.parse::<CurrencyCode>(),
            self.state.to.parse::<CurrencyCode>(),
        ) else {
            return;
        };
        let today = Local::now().date_naive();
        match self
            .converter
            .chart_series(&from, &to, period, today, &mut rand::thread_rng())
        {
            Some(points) => println!("{}", chart::render_table(&from, &to, period, &points)),
            None => println!(
                "{}",
                ui::style_text("Convert an amount first to load rates", ui::StyleType::Subtle)
            ),
        }
    }

    /// Returns false when the shell should exit.
    async fn handle(&mut self, command: ShellCommand) -> bool {
        match command {
            ShellCommand::Quit => return false,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Convert { amount, pair } => {
                if let Some((from, to)) = pair {
                    self.state.from = from.to_uppercase();
                    self.state.to = to.to_uppercase();
                }
                self.state.amount = Some(amount);
                self.convert().await;
            }
            ShellCommand::From(code) => {
                self.state.from = code.to_uppercase();
                self.convert().await;
            }
            ShellCommand::To(code) => {
                self.state.to = code.to_uppercase();
                if self.state.amount.is_some() {
                    self.convert().await;
                } else {
                    self.preview_rate();
                }
            }
            ShellCommand::Swap => {
                self.state.swap();
                println!("{} -> {}", self.state.from, self.state.to);
                self.convert().await;
            }
            ShellCommand::Chart(period) => {
                self.state.period = period;
                self.show_chart(period);
            }
        }
        true
    }

    fn prompt(&mut self) -> Result<()> {
        if let Some(notice) = self.notices.visible(Instant::now()) {
            println!("{}", ui::style_text(notice.message(), ui::StyleType::Error));
        }
        print!("{} {}> ", self.state.from, self.state.to);
        std::io::stdout().flush()?;
        Ok(())
    }
}

pub async fn run<F, C>(converter: &mut Converter<F, C>, from: &str, to: &str) -> Result<()>
where
    F: FiatRateProvider,
    C: CryptoRateProvider,
{
    let state = ShellState::new(from, to);
    let spinner = ui::new_spinner("Loading exchange rates...");
    if let Ok(base) = state.from.parse::<CurrencyCode>() {
        if let Err(e) = converter.load_initial(&base).await {
            debug!(error = %e, "Failed to load initial exchange rates");
        }
    }
    spinner.finish_and_clear();

    println!("{}", ui::style_text("xfx interactive", ui::StyleType::Title));
    println!("{}", ui::style_text("Type 'help' for commands", ui::StyleType::Subtle));

    let mut shell = Shell {
        converter,
        state,
        notices: NoticeBoard::default(),
    };
    shell.preview_rate();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !shell.handle(command).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => shell.notices.raise(message, Instant::now()),
        }
    }
    Ok(())
}
