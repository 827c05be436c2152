// Yahoo Finance chart-API parsing
use crate::model::{ParserError, PricePoint, PriceSeries};
use crate::utils::date_from_unix;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

pub trait SeriesParser: Send + Sync {
    fn parse(&self, body: &str) -> Result<PriceSeries, ParserError>;
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Parser for the `/v8/finance/chart` JSON payload.
pub struct ChartParser;

impl ChartParser {
    pub fn new() -> Self {
        Self
    }

    fn at<T: Copy>(values: &[Option<T>], idx: usize) -> Option<T> {
        values.get(idx).copied().flatten()
    }
}

impl Default for ChartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesParser for ChartParser {
    fn parse(&self, body: &str) -> Result<PriceSeries, ParserError> {
        let response: ChartResponse = serde_json::from_str(body)?;

        if let Some(err) = response.chart.error {
            let msg = err
                .description
                .or(err.code)
                .unwrap_or_else(|| "unknown chart error".into());
            return Err(ParserError::NoData(msg));
        }

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or(ParserError::MissingField("chart.result"))?;

        if result.timestamp.is_empty() {
            return Err(ParserError::NoData("empty price history".into()));
        }

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let adjclose = result
            .indicators
            .adjclose
            .into_iter()
            .next()
            .map(|a| a.adjclose)
            .unwrap_or_default();

        // Keyed by exchange-local date: sorts ascending. On duplicate dates the
        // later row wins unless it would replace a close with a missing one.
        let mut by_date: BTreeMap<NaiveDate, PricePoint> = BTreeMap::new();
        for (idx, &ts) in result.timestamp.iter().enumerate() {
            let Some(date) = date_from_unix(ts, result.meta.gmtoffset) else {
                return Err(ParserError::MissingField("timestamp"));
            };
            let point = PricePoint {
                date,
                open: Self::at(&quote.open, idx).unwrap_or(f64::NAN),
                high: Self::at(&quote.high, idx).unwrap_or(f64::NAN),
                low: Self::at(&quote.low, idx).unwrap_or(f64::NAN),
                close: Self::at(&quote.close, idx),
                adjusted_close: Self::at(&adjclose, idx),
                volume: Self::at(&quote.volume, idx).unwrap_or(0),
            };
            let keep_held = by_date
                .get(&date)
                .is_some_and(|held| held.close.is_some() && point.close.is_none());
            if !keep_held {
                by_date.insert(date, point);
            }
        }

        Ok(PriceSeries::new(by_date.into_values().collect()))
    }
}
