use crate::model::Trend;

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

pub struct MarketIndicators;

impl MarketIndicators {
    /// Simple day-over-day returns, one fewer than `closes`.
    pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
        closes
            .windows(2)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect()
    }

    /// Bessel-corrected standard deviation. NaN for fewer than two values.
    pub fn sample_std_dev(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return f64::NAN;
        }
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>() / (count - 1.0);
        variance.sqrt()
    }

    /// Mean of the last `window` values, if there are that many.
    pub fn trailing_mean(data: &[f64], window: usize) -> Option<f64> {
        if window == 0 || data.len() < window {
            return None;
        }
        let tail = &data[data.len() - window..];
        Some(tail.iter().sum::<f64>() / window as f64)
    }

    /// Max ignoring NaN; NaN only if every value is NaN.
    pub fn nan_max(values: impl IntoIterator<Item = f64>) -> f64 {
        values.into_iter().fold(f64::NAN, f64::max)
    }

    /// Min ignoring NaN; NaN only if every value is NaN.
    pub fn nan_min(values: impl IntoIterator<Item = f64>) -> f64 {
        values.into_iter().fold(f64::NAN, f64::min)
    }

    /// Both averages are required to classify; anything else is insufficient.
    pub fn classify_trend(latest: f64, ma_short: Option<f64>, ma_long: Option<f64>) -> Trend {
        match (ma_short, ma_long) {
            (Some(short), Some(long)) => {
                if latest > short && short > long {
                    Trend::Bullish
                } else if latest > short {
                    Trend::Neutral
                } else {
                    Trend::Bearish
                }
            }
            _ => Trend::InsufficientData,
        }
    }
}
