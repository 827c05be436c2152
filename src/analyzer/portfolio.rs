use crate::model::{AggregateError, AnalysisRecord, PortfolioSummary};
use std::cmp::Ordering;

/// Cross-symbol ranking over finished analyses.
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Picks best and worst performers by return and keeps the table in input order.
    pub fn aggregate(&self, records: Vec<AnalysisRecord>) -> Result<PortfolioSummary, AggregateError> {
        if records.is_empty() {
            return Err(AggregateError::EmptyPortfolio);
        }

        let best = Self::select(&records, Ordering::Greater)
            .ok_or(AggregateError::DegenerateMetric)?
            .clone();
        let worst = Self::select(&records, Ordering::Less)
            .ok_or(AggregateError::DegenerateMetric)?
            .clone();

        Ok(PortfolioSummary {
            table: records,
            best,
            worst,
        })
    }

    /// First record whose return beats every earlier one in direction `wanted`.
    /// Records with a NaN return are never selected.
    fn select(records: &[AnalysisRecord], wanted: Ordering) -> Option<&AnalysisRecord> {
        let mut selected: Option<&AnalysisRecord> = None;
        for candidate in records.iter().filter(|r| !r.return_pct().is_nan()) {
            let replace = match selected {
                None => true,
                Some(held) => candidate.return_pct().partial_cmp(&held.return_pct()) == Some(wanted),
            };
            if replace {
                selected = Some(candidate);
            }
        }
        selected
    }
}

impl Default for PortfolioAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordFields, Trend};

    fn record(symbol: &str, return_pct: f64) -> AnalysisRecord {
        AnalysisRecord::new(
            symbol,
            RecordFields {
                latest_price: 100.0,
                start_price: 100.0,
                highest_price: 110.0,
                lowest_price: 90.0,
                return_pct,
                volatility_pct: 1.0,
                ma_50: None,
                ma_200: None,
                trend: Trend::InsufficientData,
            },
        )
    }

    fn symbols(summary: &PortfolioSummary) -> Vec<&str> {
        summary.table.iter().map(|r| r.symbol()).collect()
    }

    #[test]
    fn ties_resolve_to_first_in_input_order() {
        let aggregator = PortfolioAggregator::new();

        let summary = aggregator
            .aggregate(vec![record("A", 5.0), record("B", 10.0), record("C", 10.0)])
            .unwrap();
        assert_eq!(summary.best.symbol(), "B");
        assert_eq!(summary.worst.symbol(), "A");

        let summary = aggregator
            .aggregate(vec![record("A", -2.0), record("B", -2.0), record("C", 1.0)])
            .unwrap();
        assert_eq!(summary.worst.symbol(), "A");
        assert_eq!(summary.best.symbol(), "C");
    }

    #[test]
    fn table_keeps_input_order() {
        let summary = PortfolioAggregator::new()
            .aggregate(vec![record("Z", 1.0), record("A", 30.0), record("M", -4.0)])
            .unwrap();
        assert_eq!(symbols(&summary), vec!["Z", "A", "M"]);
        assert_eq!(summary.best.symbol(), "A");
        assert_eq!(summary.worst.symbol(), "M");
    }

    #[test]
    fn single_record_is_both_best_and_worst() {
        let summary = PortfolioAggregator::new()
            .aggregate(vec![record("ONLY", 3.0)])
            .unwrap();
        assert_eq!(summary.best.symbol(), "ONLY");
        assert_eq!(summary.worst.symbol(), "ONLY");
    }

    #[test]
    fn empty_portfolio_is_an_error() {
        let result = PortfolioAggregator::new().aggregate(Vec::new());
        assert!(matches!(result, Err(AggregateError::EmptyPortfolio)));
    }

    #[test]
    fn nan_returns_are_skipped() {
        let summary = PortfolioAggregator::new()
            .aggregate(vec![record("N", f64::NAN), record("A", 2.0), record("B", -1.0)])
            .unwrap();
        assert_eq!(summary.best.symbol(), "A");
        assert_eq!(summary.worst.symbol(), "B");
        assert_eq!(summary.table.len(), 3);
    }

    #[test]
    fn all_nan_returns_are_degenerate() {
        let result = PortfolioAggregator::new()
            .aggregate(vec![record("N1", f64::NAN), record("N2", f64::NAN)]);
        assert!(matches!(result, Err(AggregateError::DegenerateMetric)));
    }
}
