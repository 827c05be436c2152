// Core structs: PricePoint, PriceSeries, AnalysisRecord, FailureRecord, errors
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// `None` when the provider returned no close for this row.
    pub close: Option<f64>,
    pub adjusted_close: Option<f64>,
    pub volume: u64,
}

/// Daily price history of a single symbol, ascending by date.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Bullish,
    Neutral,
    Bearish,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Bullish => "BULLISH",
            Trend::Neutral => "NEUTRAL",
            Trend::Bearish => "BEARISH",
            Trend::InsufficientData => "INSUFFICIENT_DATA",
        }
    }

    /// Human readable label for reports. `has_short_ma` only affects the
    /// insufficient-data wording.
    pub fn detail(&self, has_short_ma: bool) -> &'static str {
        match self {
            Trend::Bullish => "🟢 BULLISH (Strong uptrend)",
            Trend::Neutral => "🟡 NEUTRAL (Mixed signals)",
            Trend::Bearish => "🔴 BEARISH (Downtrend)",
            Trend::InsufficientData if has_short_ma => "⚪ INSUFFICIENT DATA (need 200 days)",
            Trend::InsufficientData => "⚪ INSUFFICIENT DATA (need 50+ days)",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived metrics for one symbol. Built once by the analyzer, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    symbol: String,
    latest_price: f64,
    start_price: f64,
    highest_price: f64,
    lowest_price: f64,
    return_pct: f64,
    volatility_pct: f64,
    price_range: f64,
    ma_50: Option<f64>,
    ma_200: Option<f64>,
    trend: Trend,
}

/// Field-by-field input for [`AnalysisRecord::new`].
#[derive(Debug, Clone)]
pub struct RecordFields {
    pub latest_price: f64,
    pub start_price: f64,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub return_pct: f64,
    pub volatility_pct: f64,
    pub ma_50: Option<f64>,
    pub ma_200: Option<f64>,
    pub trend: Trend,
}

impl AnalysisRecord {
    pub fn new(symbol: impl Into<String>, fields: RecordFields) -> Self {
        Self {
            symbol: symbol.into(),
            latest_price: fields.latest_price,
            start_price: fields.start_price,
            highest_price: fields.highest_price,
            lowest_price: fields.lowest_price,
            return_pct: fields.return_pct,
            volatility_pct: fields.volatility_pct,
            price_range: fields.highest_price - fields.lowest_price,
            ma_50: fields.ma_50,
            ma_200: fields.ma_200,
            trend: fields.trend,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn latest_price(&self) -> f64 {
        self.latest_price
    }

    pub fn start_price(&self) -> f64 {
        self.start_price
    }

    pub fn highest_price(&self) -> f64 {
        self.highest_price
    }

    pub fn lowest_price(&self) -> f64 {
        self.lowest_price
    }

    pub fn return_pct(&self) -> f64 {
        self.return_pct
    }

    pub fn volatility_pct(&self) -> f64 {
        self.volatility_pct
    }

    pub fn price_range(&self) -> f64 {
        self.price_range
    }

    pub fn ma_50(&self) -> Option<f64> {
        self.ma_50
    }

    pub fn ma_200(&self) -> Option<f64> {
        self.ma_200
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub symbol: String,
    pub reason: String,
}

impl FailureRecord {
    pub fn new(symbol: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }
}

/// Ranked view over every successfully analyzed symbol.
#[derive(Debug, Clone)]
pub struct PortfolioSummary {
    /// Records in the order the symbols were analyzed.
    pub table: Vec<AnalysisRecord>,
    pub best: AnalysisRecord,
    pub worst: AnalysisRecord,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No data returned (invalid ticker or no recent trading data): {0}")]
    NoData(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Http(_) | FetchError::Timeout)
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("{0}")]
    NoData(String),
}

impl From<ParserError> for FetchError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::NoData(msg) => FetchError::NoData(msg),
            other => FetchError::InvalidResponse(other.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("Data returned but missing Close prices")]
    EmptySeries,
    #[error("degenerate series: {0}")]
    InvalidSeries(String),
}

/// Anything that can make a single symbol fail.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("no records to aggregate")]
    EmptyPortfolio,
    #[error("every record has an undefined return")]
    DegenerateMetric,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
