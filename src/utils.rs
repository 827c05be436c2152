// Utility functions
use chrono::{DateTime, NaiveDate};

/// Converts a unix timestamp (seconds) to the calendar date at `utc_offset` seconds from UTC.
pub fn date_from_unix(ts: i64, utc_offset: i64) -> Option<NaiveDate> {
    let local = ts.checked_add(utc_offset)?;
    DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive())
}

/// Formats an optional price as `$x.xx`, or `-` when absent.
pub fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${:.2}", v),
        None => "-".to_string(),
    }
}
