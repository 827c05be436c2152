// Terminal presentation of analysis results
use crate::model::{AnalysisRecord, ExportError, FailureRecord, PortfolioSummary};
use crate::storage::ResultSink;
use crate::utils::fmt_price;
use std::io::Write;

const RULE_WIDTH: usize = 60;

/// Renders per-symbol reports, the comparison table and skipped symbols.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    fn heading(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        writeln!(self.out, "{}", title)?;
        self.rule()
    }

    pub fn banner(&mut self) -> Result<(), ExportError> {
        self.rule()?;
        writeln!(self.out, "Stock Analyzer")?;
        self.rule()?;
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> Result<(), ExportError> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    /// Detailed block for one analyzed symbol.
    pub fn write_record(&mut self, record: &AnalysisRecord) -> Result<(), ExportError> {
        self.heading(&format!("ANALYZING: {}", record.symbol()))?;
        let out = &mut self.out;
        writeln!(out, "Highest price: ${:.2}", record.highest_price())?;
        writeln!(out, "Lowest price:  ${:.2}", record.lowest_price())?;
        writeln!(out, "Start price:   ${:.2}", record.start_price())?;
        writeln!(out, "Latest price:  ${:.2}", record.latest_price())?;
        writeln!(out, "1Y Return:     {:+.2}%", record.return_pct())?;
        writeln!(out, "Volatility:    {:.4}%", record.volatility_pct())?;
        writeln!(out, "Price Range:   ${:.2}", record.price_range())?;
        if let Some(ma) = record.ma_50() {
            writeln!(out, "50-Day MA:     ${:.2}", ma)?;
        }
        if let Some(ma) = record.ma_200() {
            writeln!(out, "200-Day MA:    ${:.2}", ma)?;
        }
        writeln!(
            out,
            "Trend:         {}",
            record.trend().detail(record.ma_50().is_some())
        )?;
        Ok(())
    }

    /// In-line notice for a symbol that could not be analyzed.
    pub fn write_skipped(&mut self, failure: &FailureRecord) -> Result<(), ExportError> {
        self.heading(&format!("ANALYZING: {}", failure.symbol))?;
        writeln!(self.out, "❌ Skipped {}: {}", failure.symbol, failure.reason)?;
        Ok(())
    }

    fn write_table(&mut self, table: &[AnalysisRecord]) -> std::io::Result<()> {
        writeln!(
            self.out,
            "{:<8} {:>12} {:>12} {:>13} {:>12} {:>10} {:>10}  {}",
            "Ticker", "Latest Price", "1Y Return %", "Volatility %", "Price Range", "50D MA", "200D MA", "Trend"
        )?;
        for r in table {
            writeln!(
                self.out,
                "{:<8} {:>12.2} {:>12.2} {:>13.4} {:>12.2} {:>10} {:>10}  {}",
                r.symbol(),
                r.latest_price(),
                r.return_pct(),
                r.volatility_pct(),
                r.price_range(),
                fmt_price(r.ma_50()),
                fmt_price(r.ma_200()),
                r.trend()
            )?;
        }
        Ok(())
    }
}

impl<W: Write> ResultSink for ConsoleReporter<W> {
    fn write_results(&mut self, summary: &PortfolioSummary) -> Result<(), ExportError> {
        self.heading("COMPARISON TABLE")?;
        self.write_table(&summary.table)?;

        writeln!(self.out)?;
        self.rule()?;
        writeln!(
            self.out,
            "🏆 BEST PERFORMER: {} ({:+.2}%)",
            summary.best.symbol(),
            summary.best.return_pct()
        )?;
        writeln!(
            self.out,
            "📉 WORST PERFORMER: {} ({:+.2}%)",
            summary.worst.symbol(),
            summary.worst.return_pct()
        )?;
        self.rule()?;
        self.out.flush()?;
        Ok(())
    }

    fn write_failures(&mut self, failures: &[FailureRecord]) -> Result<(), ExportError> {
        if failures.is_empty() {
            return Ok(());
        }
        self.heading("TICKERS SKIPPED")?;
        for failure in failures {
            writeln!(self.out, "- {}: {}", failure.symbol, failure.reason)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
