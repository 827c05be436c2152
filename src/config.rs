use serde::Deserialize;
use std::fs;

/// Ranges accepted by the chart endpoint.
pub const VALID_PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Upper bound on symbols fetched at the same time.
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) StockAnalyzer/0.1".into(),
            timeout_seconds: 10,
            max_retries: 2,
            retry_base_delay_ms: 500,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub period: String,
    pub output_path: String,
    pub log_level: String,
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            period: "1y".into(),
            output_path: "stock_analysis_results.csv".into(),
            log_level: "info".into(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !VALID_PERIODS.contains(&self.period.as_str()) {
            return Err(format!(
                "invalid period '{}', expected one of {}",
                self.period,
                VALID_PERIODS.join(", ")
            ));
        }
        if self.fetch.concurrency == 0 {
            return Err("fetch.concurrency must be at least 1".into());
        }
        if self.fetch.timeout_seconds == 0 {
            return Err("fetch.timeout_seconds must be at least 1".into());
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(format!("invalid log_level '{}'", self.log_level));
        }
        Ok(())
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
