use crate::config::FetchConfig;
use crate::fetcher::traits::PriceFetcher;
use crate::model::{FetchError, PriceSeries};
use crate::parser::{ChartParser, SeriesParser};
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Daily history from the Yahoo Finance chart endpoint.
pub struct YahooFetcher {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_base_delay: Duration,
    parser: ChartParser,
}

impl YahooFetcher {
    pub fn new(cfg: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            max_retries: cfg.max_retries,
            retry_base_delay: Duration::from_millis(cfg.retry_base_delay_ms),
            parser: ChartParser::new(),
        })
    }

    fn build_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }

    /// Exponential backoff with up to 250ms of jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let jitter = rand::rng().random_range(0..250);
        self.retry_base_delay.saturating_mul(factor) + Duration::from_millis(jitter)
    }

    async fn fetch_once(&self, symbol: &str, period: &str) -> Result<PriceSeries, FetchError> {
        let url = self.build_url(symbol);
        debug!("GET {} range={}", url, period);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", period),
                ("interval", "1d"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(FetchError::Http(format!("server responded {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        // Unknown symbols come back as 404 with a chart.error body.
        match self.parser.parse(&body) {
            Ok(series) => Ok(series),
            Err(e) if status.is_success() || status == StatusCode::NOT_FOUND => Err(e.into()),
            Err(_) => Err(FetchError::InvalidResponse(format!("status {}", status))),
        }
    }
}

#[async_trait::async_trait]
impl PriceFetcher for YahooFetcher {
    async fn fetch(&self, symbol: &str, period: &str) -> Result<PriceSeries, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(symbol, period).await {
                Ok(series) => return Ok(series),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        "Fetch {} failed ({}), retry {}/{} in {:?}",
                        symbol, e, attempt, self.max_retries, delay
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
