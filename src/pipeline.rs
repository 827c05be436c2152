use crate::analyzer::SeriesAnalyzer;
use crate::fetcher::PriceFetcher;
use crate::model::{AnalysisRecord, FailureRecord, SymbolError};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// What happened to one requested symbol.
#[derive(Debug)]
pub enum SymbolOutcome {
    Analyzed(AnalysisRecord),
    Skipped(FailureRecord),
}

/// Everything produced for a batch of symbols, in request order.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub outcomes: Vec<SymbolOutcome>,
}

impl RunOutcome {
    pub fn records(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            SymbolOutcome::Analyzed(record) => Some(record),
            SymbolOutcome::Skipped(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            SymbolOutcome::Skipped(failure) => Some(failure),
            SymbolOutcome::Analyzed(_) => None,
        })
    }

    /// Splits into successes and failures, each keeping request order.
    pub fn into_parts(self) -> (Vec<AnalysisRecord>, Vec<FailureRecord>) {
        let mut records = Vec::new();
        let mut failures = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                SymbolOutcome::Analyzed(record) => records.push(record),
                SymbolOutcome::Skipped(failure) => failures.push(failure),
            }
        }
        (records, failures)
    }
}

/// Fetches and analyzes a single symbol.
pub async fn process_symbol<F, A>(
    fetcher: &F,
    analyzer: &A,
    symbol: &str,
    period: &str,
) -> Result<AnalysisRecord, SymbolError>
where
    F: PriceFetcher + ?Sized,
    A: SeriesAnalyzer + ?Sized,
{
    info!("Fetching {} ({})...", symbol, period);
    let series = fetcher.fetch(symbol, period).await?;
    if series.is_empty() {
        warn!("{} returned an empty series", symbol);
    }
    info!("Analyzing {} ({} rows)...", symbol, series.len());
    let record = analyzer.analyze(symbol, &series)?;
    Ok(record)
}

/// Runs every symbol with at most `concurrency` fetches in flight.
/// A failing symbol becomes a [`FailureRecord`] and never stops the others.
pub async fn run<F, A>(
    symbols: &[String],
    fetcher: &F,
    analyzer: &A,
    period: &str,
    concurrency: usize,
) -> RunOutcome
where
    F: PriceFetcher + ?Sized,
    A: SeriesAnalyzer + ?Sized,
{
    let results: Vec<(&String, Result<AnalysisRecord, SymbolError>)> = stream::iter(symbols)
        .map(|symbol| async move { (symbol, process_symbol(fetcher, analyzer, symbol, period).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = RunOutcome::default();
    for (symbol, result) in results {
        match result {
            Ok(record) => {
                info!(
                    "{}: {:+.2}% return, trend {}",
                    symbol,
                    record.return_pct(),
                    record.trend()
                );
                outcome.outcomes.push(SymbolOutcome::Analyzed(record));
            }
            Err(e) => {
                warn!("Skipped {}: {}", symbol, e);
                outcome
                    .outcomes
                    .push(SymbolOutcome::Skipped(FailureRecord::new(symbol.as_str(), e)));
            }
        }
    }

    info!(
        "Finished {} symbols: {} analyzed, {} skipped",
        symbols.len(),
        outcome.records().count(),
        outcome.failures().count()
    );
    outcome
}
