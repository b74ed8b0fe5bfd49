use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xfx::core::chart::ChartPeriod;
use xfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        amount: String,
        /// Source currency code, e.g. USD or BTC
        from: Option<String>,
        /// Target currency code
        to: Option<String>,
        /// Also show a simulated rate chart for 7, 30 or 90 days
        #[arg(long)]
        chart: Option<ChartPeriod>,
    },
    /// List exchange rates for a base currency
    Rates {
        /// Base currency code
        base: Option<String>,
    },
    /// Start an interactive converter
    Interactive,
}

impl From<Commands> for xfx::AppCommand {
    fn from(cmd: Commands) -> xfx::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                chart,
            } => xfx::AppCommand::Convert {
                amount,
                from,
                to,
                chart,
            },
            Commands::Rates { base } => xfx::AppCommand::Rates { base },
            Commands::Interactive => xfx::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xfx::cli::setup::setup(),
        Some(cmd) => xfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
