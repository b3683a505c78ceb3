use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use foliostat::app;
use foliostat::clock::SystemClock;
use foliostat::config::{default_config_path, ProviderKind, ResolvedConfig};
use foliostat::market_data::providers::YahooQuoteProvider;
use foliostat::market_data::{NullQuoteProvider, QuoteProvider};
use foliostat::storage::JsonSnapshotStore;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "foliostat")]
#[command(about = "Broker-grouped stock portfolio statistics")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a snapshot from the current holdings export
    Generate {
        /// Holdings CSV to read instead of the configured one
        #[arg(long)]
        holdings: Option<PathBuf>,
    },
    /// Show the latest snapshot of each month, oldest first
    History,
    /// Show every stored snapshot in chronological order
    Trend,
    /// List stored snapshots
    List,
    /// Show current configuration
    Config,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn quote_provider(kind: ProviderKind) -> Box<dyn QuoteProvider> {
    match kind {
        ProviderKind::Yahoo => Box::new(YahooQuoteProvider::new()),
        ProviderKind::None => Box::new(NullQuoteProvider),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .init();

    let cli = Cli::parse();

    let config = ResolvedConfig::load_or_default(&cli.config)?;
    let store = JsonSnapshotStore::new(&config.data_dir);

    match cli.command {
        Some(Command::Generate { holdings }) => {
            let provider = quote_provider(config.provider.kind);
            let clock = SystemClock;
            let holdings_path = holdings.unwrap_or(config.holdings_file);
            let output =
                app::generate_snapshot(&store, provider.as_ref(), &clock, &holdings_path).await?;
            print_json(&output)?;
        }
        Some(Command::History) => {
            let output = app::monthly_history(&store).await?;
            print_json(&output)?;
        }
        Some(Command::Trend) => {
            let output = app::snapshot_trend(&store).await?;
            print_json(&output)?;
        }
        Some(Command::List) => {
            let output = app::list_snapshots(&store).await?;
            print_json(&output)?;
        }
        Some(Command::Config) => {
            println!("Config file: {}", cli.config.display());
            println!("Data directory: {}", config.data_dir.display());
            println!("Holdings file: {}", config.holdings_file.display());
        }
        None => {
            println!("Foliostat - Portfolio Statistics");
            println!("================================\n");
            println!("Config: {}", cli.config.display());
            println!("Data directory: {}\n", config.data_dir.display());
            println!("Commands:");
            println!("  generate  Generate a snapshot from the holdings export");
            println!("  history   Latest snapshot of each month");
            println!("  trend     Every snapshot in chronological order");
            println!("  list      List stored snapshots");
            println!("  config    Show current configuration\n");
            println!("Run 'foliostat --help' for more options.");
        }
    }

    Ok(())
}
