use async_trait::async_trait;
use thiserror::Error;

use crate::models::{IssuerMetadata, PriceBar};

#[derive(Debug, Error)]
pub enum HistorySourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no data for ticker {0}")]
    Empty(String),

    #[error("rate limited")]
    RateLimited,
}

/// Supplies OHLC history and issuer metadata for one ticker. Implementations
/// must return bars ascending by date.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Daily bars covering roughly `years` of history (providers may return
    /// slightly more; callers clamp their own windows).
    async fn fetch_history(
        &self,
        ticker: &str,
        years: u32,
    ) -> Result<Vec<PriceBar>, HistorySourceError>;

    /// Company name and fundamentals. Partial or empty metadata is fine and
    /// is not an error.
    async fn fetch_issuer_metadata(
        &self,
        ticker: &str,
    ) -> Result<IssuerMetadata, HistorySourceError>;
}

/// Tickers without an exchange suffix are assumed NSE-listed and get the
/// `.NS` suffix appended before lookup.
pub fn normalize_ticker(ticker: &str) -> String {
    let trimmed = ticker.trim();
    if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        format!("{trimmed}.NS")
    }
}
