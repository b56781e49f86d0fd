use tokio::time::{sleep, Duration};
use tracing::warn;

use crate::errors::AppError;
use crate::external::history_source::{normalize_ticker, HistorySource, HistorySourceError};
use crate::models::{IssuerMetadata, PriceBar};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// One trading year of daily bars. Metrics and forecasts refuse to run on
/// less than this.
pub const MIN_HISTORY_POINTS: usize = 252;

/// Fetch daily history with bounded retries. Transient provider failures are
/// retried with a fixed short backoff; rate limiting is surfaced immediately
/// so callers can decide whether to degrade.
pub async fn fetch_history(
    source: &dyn HistorySource,
    ticker: &str,
    years: u32,
) -> Result<Vec<PriceBar>, AppError> {
    let symbol = normalize_ticker(ticker);

    let mut attempt = 0;
    loop {
        attempt += 1;
        match source.fetch_history(&symbol, years).await {
            Ok(bars) if bars.is_empty() => {
                return Err(AppError::Upstream(format!("No data available for {symbol}")));
            }
            Ok(bars) => return Ok(bars),
            Err(HistorySourceError::RateLimited) => return Err(AppError::RateLimited),
            // An unknown or delisted ticker will not appear on retry.
            Err(HistorySourceError::Empty(_)) => {
                return Err(AppError::Upstream(format!("No data available for {symbol}")));
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!(
                    "Fetch failed for {} (attempt {}/{}): {}",
                    symbol, attempt, MAX_ATTEMPTS, e
                );
                sleep(RETRY_BACKOFF).await;
            }
            Err(e) => {
                return Err(AppError::Upstream(format!(
                    "Data fetch failed for {symbol} after {MAX_ATTEMPTS} attempts: {e}"
                )));
            }
        }
    }
}

/// Like `fetch_history` but additionally enforces the one-trading-year
/// minimum required by the metrics engine.
pub async fn fetch_history_for_metrics(
    source: &dyn HistorySource,
    ticker: &str,
    years: u32,
) -> Result<Vec<PriceBar>, AppError> {
    let bars = fetch_history(source, ticker, years).await?;

    if bars.len() < MIN_HISTORY_POINTS {
        return Err(AppError::InsufficientData(format!(
            "Insufficient data for {}: {} trading days, need {}",
            normalize_ticker(ticker),
            bars.len(),
            MIN_HISTORY_POINTS
        )));
    }

    Ok(bars)
}

/// Issuer metadata fetch. Failures degrade to empty metadata rather than
/// failing the request; fundamentals are optional everywhere downstream.
pub async fn fetch_metadata(source: &dyn HistorySource, ticker: &str) -> IssuerMetadata {
    let symbol = normalize_ticker(ticker);

    match source.fetch_issuer_metadata(&symbol).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Metadata fetch failed for {}: {}", symbol, e);
            IssuerMetadata::default()
        }
    }
}

/// Display name: the issuer's long name when known, otherwise the ticker
/// with its exchange suffix stripped.
pub fn display_name(metadata: &IssuerMetadata, symbol: &str) -> String {
    metadata
        .long_name
        .clone()
        .unwrap_or_else(|| symbol.trim_end_matches(".NS").to_string())
}
