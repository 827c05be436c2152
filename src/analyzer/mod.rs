// Analyzer module: per-symbol metrics and the cross-symbol ranking built on them.

pub mod price_analysis;
pub mod market_indicators;
pub mod portfolio;

// Re-export the main implementations for ease of use.
pub use portfolio::PortfolioAggregator;
pub use price_analysis::{AnalyzerImpl, SeriesAnalyzer};
