use crate::model::{FetchError, PriceSeries};

/// Source of daily price history. Implementations own transport, retries and parsing;
/// callers get back a series sorted ascending by date.
#[async_trait::async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch(&self, symbol: &str, period: &str) -> Result<PriceSeries, FetchError>;
}
