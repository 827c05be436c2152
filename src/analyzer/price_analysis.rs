use crate::analyzer::market_indicators::{LONG_WINDOW, MarketIndicators, SHORT_WINDOW};
use crate::model::{AnalysisError, AnalysisRecord, PricePoint, PriceSeries, RecordFields};
use tracing::debug;

/// Trait defining the interface for a single-symbol series analyzer.
pub trait SeriesAnalyzer: Send + Sync {
    fn analyze(&self, symbol: &str, series: &PriceSeries) -> Result<AnalysisRecord, AnalysisError>;
}

/// Default analyzer: extrema, return, volatility, 50/200-day averages and trend.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }

    /// Drops rows without a usable close and checks the date ordering of what is left.
    fn clean(series: &PriceSeries) -> Result<Vec<(&PricePoint, f64)>, AnalysisError> {
        let rows: Vec<(&PricePoint, f64)> = series
            .points()
            .iter()
            .filter_map(|p| p.close.filter(|c| !c.is_nan()).map(|c| (p, c)))
            .collect();

        if rows.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }

        if let Some(w) = rows.windows(2).find(|w| w[1].0.date <= w[0].0.date) {
            return Err(AnalysisError::InvalidSeries(format!(
                "dates not strictly increasing at {} -> {}",
                w[0].0.date, w[1].0.date
            )));
        }

        Ok(rows)
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesAnalyzer for AnalyzerImpl {
    fn analyze(&self, symbol: &str, series: &PriceSeries) -> Result<AnalysisRecord, AnalysisError> {
        let rows = Self::clean(series)?;
        let dropped = series.len() - rows.len();
        if dropped > 0 {
            debug!("{}: dropped {} rows without a close price", symbol, dropped);
        }

        let closes: Vec<f64> = rows.iter().map(|(_, c)| *c).collect();
        // `clean` guarantees at least one row.
        let start_price = closes[0];
        let latest_price = closes[closes.len() - 1];

        if start_price == 0.0 || !start_price.is_finite() {
            return Err(AnalysisError::InvalidSeries(format!(
                "start price is {}",
                start_price
            )));
        }

        let highest_price = MarketIndicators::nan_max(rows.iter().map(|(p, _)| p.high));
        let lowest_price = MarketIndicators::nan_min(rows.iter().map(|(p, _)| p.low));

        let return_pct = (latest_price - start_price) / start_price * 100.0;

        let daily_returns = MarketIndicators::daily_returns(&closes);
        let volatility_pct = MarketIndicators::sample_std_dev(&daily_returns) * 100.0;

        let ma_50 = MarketIndicators::trailing_mean(&closes, SHORT_WINDOW);
        let ma_200 = MarketIndicators::trailing_mean(&closes, LONG_WINDOW);
        let trend = MarketIndicators::classify_trend(latest_price, ma_50, ma_200);

        debug!(
            "{}: {} rows, return {:.2}%, volatility {:.4}%, trend {}",
            symbol,
            closes.len(),
            return_pct,
            volatility_pct,
            trend
        );

        Ok(AnalysisRecord::new(
            symbol,
            RecordFields {
                latest_price,
                start_price,
                highest_price,
                lowest_price,
                return_pct,
                volatility_pct,
                ma_50,
                ma_200,
                trend,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Trend;
    use chrono::{Days, NaiveDate};

    fn point(day: u64, close: Option<f64>) -> PricePoint {
        let c = close.unwrap_or(f64::NAN);
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(day),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close,
            adjusted_close: close,
            volume: 1_000,
        }
    }

    fn series_from(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| point(i as u64, Some(c)))
                .collect(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn constant_series_is_bearish_under_strict_comparison() {
        let series = series_from(&vec![100.0; 200]);
        let mut points = series.points().to_vec();
        for p in &mut points {
            p.high = 100.0;
            p.low = 100.0;
        }
        let record = AnalyzerImpl::new()
            .analyze("FLAT", &PriceSeries::new(points))
            .unwrap();

        assert_eq!(record.return_pct(), 0.0);
        assert_eq!(record.volatility_pct(), 0.0);
        assert_eq!(record.ma_50(), Some(100.0));
        assert_eq!(record.ma_200(), Some(100.0));
        assert_eq!(record.highest_price(), 100.0);
        assert_eq!(record.lowest_price(), 100.0);
        assert_eq!(record.price_range(), 0.0);
        assert_eq!(record.trend(), Trend::Bearish);
    }

    #[test]
    fn basic_metrics() {
        let record = AnalyzerImpl::new()
            .analyze("ABC", &series_from(&[100.0, 110.0, 99.0]))
            .unwrap();

        assert_eq!(record.symbol(), "ABC");
        assert_eq!(record.start_price(), 100.0);
        assert_eq!(record.latest_price(), 99.0);
        assert_eq!(record.highest_price(), 111.0);
        assert_eq!(record.lowest_price(), 98.0);
        assert!(approx(record.price_range(), 13.0));
        assert!(approx(record.return_pct(), -1.0));
        assert!(approx(record.volatility_pct(), 0.02_f64.sqrt() * 100.0));
        assert_eq!(record.ma_50(), None);
        assert_eq!(record.trend(), Trend::InsufficientData);
    }

    #[test]
    fn volatility_is_nan_with_fewer_than_two_returns() {
        let analyzer = AnalyzerImpl::new();
        let single = analyzer.analyze("ONE", &series_from(&[50.0])).unwrap();
        assert!(single.volatility_pct().is_nan());
        assert_eq!(single.return_pct(), 0.0);

        let pair = analyzer.analyze("TWO", &series_from(&[50.0, 55.0])).unwrap();
        assert!(pair.volatility_pct().is_nan());
    }

    #[test]
    fn moving_averages_appear_at_thresholds() {
        let analyzer = AnalyzerImpl::new();

        let closes: Vec<f64> = (1..=49).map(|i| i as f64).collect();
        let record = analyzer.analyze("S49", &series_from(&closes)).unwrap();
        assert_eq!(record.ma_50(), None);
        assert_eq!(record.ma_200(), None);

        let closes: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        let record = analyzer.analyze("S50", &series_from(&closes)).unwrap();
        assert!(approx(record.ma_50().unwrap(), 25.5));
        assert_eq!(record.ma_200(), None);

        let closes: Vec<f64> = (1..=60).map(|i| i as f64).collect();
        let record = analyzer.analyze("S60", &series_from(&closes)).unwrap();
        assert!(approx(record.ma_50().unwrap(), 35.5));
        assert_eq!(record.ma_200(), None);
        assert_eq!(record.trend(), Trend::InsufficientData);

        let closes: Vec<f64> = (1..=199).map(|i| i as f64).collect();
        let record = analyzer.analyze("S199", &series_from(&closes)).unwrap();
        assert!(approx(record.ma_50().unwrap(), 174.5));
        assert_eq!(record.ma_200(), None);
        assert_eq!(record.trend(), Trend::InsufficientData);

        let closes: Vec<f64> = (1..=200).map(|i| i as f64).collect();
        let record = analyzer.analyze("S200", &series_from(&closes)).unwrap();
        assert!(approx(record.ma_50().unwrap(), 175.5));
        assert!(approx(record.ma_200().unwrap(), 100.5));
        assert_eq!(record.trend(), Trend::Bullish);

        let closes: Vec<f64> = (1..=250).map(|i| i as f64).collect();
        let record = analyzer.analyze("S250", &series_from(&closes)).unwrap();
        assert!(approx(record.ma_50().unwrap(), 225.5));
        assert!(approx(record.ma_200().unwrap(), 150.5));
        assert_eq!(record.trend(), Trend::Bullish);
    }

    #[test]
    fn falling_series_is_bearish() {
        let closes: Vec<f64> = (1..=220).rev().map(|i| i as f64).collect();
        let record = AnalyzerImpl::new()
            .analyze("DOWN", &series_from(&closes))
            .unwrap();
        assert_eq!(record.trend(), Trend::Bearish);
        assert!(record.return_pct() < 0.0);
    }

    #[test]
    fn missing_final_close_is_filtered() {
        let mut points = series_from(&[10.0, 11.0, 12.0]).points().to_vec();
        points.push(point(3, None));
        let record = AnalyzerImpl::new()
            .analyze("GAP", &PriceSeries::new(points))
            .unwrap();
        assert_eq!(record.latest_price(), 12.0);
        assert!(approx(record.return_pct(), 20.0));
    }

    #[test]
    fn nan_close_counts_as_missing() {
        let mut points = series_from(&[10.0, 20.0]).points().to_vec();
        points[1].close = Some(f64::NAN);
        let record = AnalyzerImpl::new()
            .analyze("NAN", &PriceSeries::new(points))
            .unwrap();
        assert_eq!(record.latest_price(), 10.0);
    }

    #[test]
    fn empty_after_cleaning_is_an_error() {
        let analyzer = AnalyzerImpl::new();
        assert_eq!(
            analyzer.analyze("NONE", &PriceSeries::default()),
            Err(AnalysisError::EmptySeries)
        );

        let points = vec![point(0, None), point(1, None)];
        assert_eq!(
            analyzer.analyze("NONE", &PriceSeries::new(points)),
            Err(AnalysisError::EmptySeries)
        );
    }

    #[test]
    fn zero_start_price_is_invalid() {
        let result = AnalyzerImpl::new().analyze("ZERO", &series_from(&[0.0, 5.0]));
        assert!(matches!(result, Err(AnalysisError::InvalidSeries(_))));
    }

    #[test]
    fn zero_close_after_start_does_not_fail() {
        let record = AnalyzerImpl::new()
            .analyze("DIP", &series_from(&[5.0, 0.0, 5.0]))
            .unwrap();
        assert_eq!(record.return_pct(), 0.0);
        assert!(!record.volatility_pct().is_finite());
    }

    #[test]
    fn unordered_dates_are_invalid() {
        let mut points = series_from(&[1.0, 2.0, 3.0]).points().to_vec();
        points.swap(0, 2);
        let result = AnalyzerImpl::new().analyze("MESS", &PriceSeries::new(points));
        assert!(matches!(result, Err(AnalysisError::InvalidSeries(_))));

        let mut points = series_from(&[1.0, 2.0]).points().to_vec();
        points[1].date = points[0].date;
        let result = AnalyzerImpl::new().analyze("DUP", &PriceSeries::new(points));
        assert!(matches!(result, Err(AnalysisError::InvalidSeries(_))));
    }
}
