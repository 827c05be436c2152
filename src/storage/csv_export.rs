use crate::model::{AnalysisRecord, ExportError, PortfolioSummary};
use crate::storage::ResultSink;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One exported row. Absent and NaN values become empty cells.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Ticker")]
    ticker: &'a str,
    #[serde(rename = "Latest Price")]
    latest_price: Option<f64>,
    #[serde(rename = "1Y Return %")]
    return_pct: Option<f64>,
    #[serde(rename = "Volatility %")]
    volatility_pct: Option<f64>,
    #[serde(rename = "Price Range")]
    price_range: Option<f64>,
    #[serde(rename = "50D MA")]
    ma_50: Option<f64>,
    #[serde(rename = "200D MA")]
    ma_200: Option<f64>,
    #[serde(rename = "Trend")]
    trend: &'static str,
}

fn cell(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

impl<'a> From<&'a AnalysisRecord> for ExportRow<'a> {
    fn from(record: &'a AnalysisRecord) -> Self {
        Self {
            ticker: record.symbol(),
            latest_price: cell(record.latest_price()),
            return_pct: cell(record.return_pct()),
            volatility_pct: cell(record.volatility_pct()),
            price_range: cell(record.price_range()),
            ma_50: record.ma_50().and_then(cell),
            ma_200: record.ma_200().and_then(cell),
            trend: record.trend().as_str(),
        }
    }
}

/// Writes the comparison table as CSV.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    path: Option<PathBuf>,
}

impl CsvExporter<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let writer = csv::Writer::from_path(path)?;
        Ok(Self {
            writer,
            path: Some(path.to_path_buf()),
        })
    }
}

#[cfg(test)]
impl<W: Write> CsvExporter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            path: None,
        }
    }

    /// Flushes and hands back the underlying writer.
    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

impl<W: Write> ResultSink for CsvExporter<W> {
    fn write_results(&mut self, summary: &PortfolioSummary) -> Result<(), ExportError> {
        for record in &summary.table {
            self.writer.serialize(ExportRow::from(record))?;
        }
        self.writer.flush()?;
        match &self.path {
            Some(path) => info!("Exported {} rows to {}", summary.table.len(), path.display()),
            None => info!("Exported {} rows", summary.table.len()),
        }
        Ok(())
    }
}
