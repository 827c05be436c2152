pub mod csv_export;

use crate::model::{ExportError, FailureRecord, PortfolioSummary};

pub use csv_export::CsvExporter;

/// Destination for finished results: files, terminals, anything tabular.
pub trait ResultSink {
    fn write_results(&mut self, summary: &PortfolioSummary) -> Result<(), ExportError>;

    /// Failures are reported separately; sinks that only hold the table ignore them.
    fn write_failures(&mut self, _failures: &[FailureRecord]) -> Result<(), ExportError> {
        Ok(())
    }
}
