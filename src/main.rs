mod analyzer;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod parser;
mod pipeline;
mod report;
mod storage;
mod utils;

use analyzer::{AnalyzerImpl, PortfolioAggregator};
use config::{AppConfig, load_config};
use fetcher::YahooFetcher;
use model::AggregateError;
use normalizer::normalize_symbols;
use pipeline::SymbolOutcome;
use report::ConsoleReporter;
use std::io::{self, BufRead, Write};
use std::path::Path;
use storage::{CsvExporter, ResultSink};
use tracing::{Level, error, info, warn};

const CONFIG_ENV: &str = "STOCK_ANALYZER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    // Load configuration from file, falling back to defaults when absent
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let config = if Path::new(&config_path).exists() {
        match load_config(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Config load error ({}): {}", config_path, e);
                return;
            }
        }
    } else {
        AppConfig::default()
    };

    // Initialize logging on stderr so the report owns stdout
    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
    }));

    info!("Using config '{}' (period {})", config_path, config.period);

    let mut console = ConsoleReporter::stdout();
    if let Err(e) = run(&config, &mut console).await {
        error!("Run failed: {}", e);
    }
}

/// Reads symbols, analyzes them and reports/exports the outcome.
async fn run(
    config: &AppConfig,
    console: &mut ConsoleReporter<io::Stdout>,
) -> Result<(), Box<dyn std::error::Error>> {
    console.banner()?;

    let raw = read_symbols_input()?;
    let symbols = normalize_symbols(&raw);
    if symbols.is_empty() {
        console.message("No tickers entered. Exiting.")?;
        return Ok(());
    }
    info!("Symbols to process: {}", symbols.join(", "));

    let fetcher = YahooFetcher::new(&config.fetch)?;
    let analyzer = AnalyzerImpl::new();
    let outcome = pipeline::run(
        &symbols,
        &fetcher,
        &analyzer,
        &config.period,
        config.fetch.concurrency,
    )
    .await;

    for entry in &outcome.outcomes {
        match entry {
            SymbolOutcome::Analyzed(record) => console.write_record(record)?,
            SymbolOutcome::Skipped(failure) => console.write_skipped(failure)?,
        }
    }

    let (records, failures) = outcome.into_parts();
    match PortfolioAggregator::new().aggregate(records) {
        Ok(summary) => {
            console.write_results(&summary)?;

            match CsvExporter::create(&config.output_path)
                .and_then(|mut exporter| exporter.write_results(&summary))
            {
                Ok(()) => console.message(&format!("\n💾 Results saved to: {}", config.output_path))?,
                Err(e) => warn!("CSV export to {} failed: {}", config.output_path, e),
            }
        }
        Err(AggregateError::EmptyPortfolio) => {
            console.message("\nNo valid tickers to analyze.")?;
        }
        Err(e @ AggregateError::DegenerateMetric) => {
            error!("Aggregation failed: {}", e);
            console.message(&format!("\nCannot rank results: {}", e))?;
        }
    }

    console.write_failures(&failures)?;
    Ok(())
}

/// Symbols come from the command line when given, otherwise from one line of stdin.
fn read_symbols_input() -> io::Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    print!("Enter stock tickers (separated by spaces): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
