//! Venue Arb CLI
//!
//! Runs the greedy cross-venue matcher over the built-in sample books or a
//! book file and prints the run.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- sample
//! cargo run -- --format json run --book books.toml
//! RUST_LOG=venue_arb=debug cargo run -- sample
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use venue_arb::arbitrage::{sample_books, ArbitrageMatcher, BookFile, QuoteBook};
use venue_arb::config::{AppConfig, OutputFormat};
use venue_arb::report::RunReport;

/// Cross-venue arbitrage matcher
#[derive(Parser, Debug)]
#[command(name = "venue-arb")]
#[command(about = "Greedily match profitable asks and bids across trading venues")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "VENUE_ARB_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Match the built-in five-venue sample books
    Sample,

    /// Match books loaded from a TOML or JSON file
    Run {
        /// Book file with [bids] and [asks] tables of "venue-fee" = [price, volume]
        #[arg(short, long)]
        book: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = bootstrap(None, std::env::args_os()).unwrap_or_else(|e| e.exit());
    init_tracing();

    let config = AppConfig::resolve(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.output.format);

    let (bids, asks) = match &cli.command {
        Commands::Sample => sample_books().context("Sample books failed validation")?,
        Commands::Run { book } => BookFile::load(book)?
            .into_books()
            .with_context(|| format!("Book file {} failed validation", book.display()))?,
    };

    let report = run_matcher(&config, bids, asks);

    match format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}

/// Load `.env` (or `env_file`) into the process, then parse arguments
///
/// Runs before tracing and clap so `RUST_LOG` and `VENUE_ARB_CONFIG` from the
/// file are visible to both.
fn bootstrap<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    if let Some(path) = env_file {
        dotenv::from_path(path).ok();
    } else {
        dotenv::dotenv().ok();
    }
    Cli::try_parse_from(args)
}

fn run_matcher(config: &AppConfig, bids: QuoteBook, asks: QuoteBook) -> RunReport {
    let matcher = ArbitrageMatcher::new(config.matcher.clone());
    info!(
        "Matcher config: max_rounds={:?}, min_profit_per_unit={}",
        config.matcher.max_rounds, config.matcher.min_profit_per_unit
    );

    let (initial_bids, initial_asks) = (bids.clone(), asks.clone());
    let (mut bids, mut asks) = (bids, asks);
    let outcome = matcher.run(&mut bids, &mut asks);

    RunReport::new(initial_bids, initial_asks, outcome, bids, asks)
}

/// Logs go to stderr so stdout only carries the report
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venue_arb=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
