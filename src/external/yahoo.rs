use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;

use crate::external::history_source::{HistorySource, HistorySourceError};
use crate::models::{IssuerMetadata, PriceBar};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct YahooSource {
    client: reqwest::Client,
}

impl YahooSource {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("equity-insight/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize, Default)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<SummaryResult>>,
}

#[derive(Debug, Deserialize, Default)]
struct SummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Deserialize, Default)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize, Default)]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
}

/// Yahoo wraps numbers as {"raw": 12.3, "fmt": "12.30"}.
#[derive(Debug, Deserialize, Default)]
struct RawValue {
    raw: Option<f64>,
}

fn column<T: Copy>(col: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    col.as_ref().and_then(|v| v.get(i).copied().flatten())
}

#[async_trait]
impl HistorySource for YahooSource {
    async fn fetch_history(
        &self,
        ticker: &str,
        years: u32,
    ) -> Result<Vec<PriceBar>, HistorySourceError> {
        // The chart API takes coarse ranges; request one extra year so a full
        // lookback window is always covered.
        let range = format!("{}y", years.saturating_add(1).max(1));
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{ticker}?range={range}&interval=1d"
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HistorySourceError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(HistorySourceError::RateLimited);
        }

        let body = resp
            .json::<ChartResponse>()
            .await
            .map_err(|e| HistorySourceError::Parse(e.to_string()))?;

        let result = body
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| HistorySourceError::BadResponse("missing chart result".into()))?;

        let timestamps = result
            .timestamp
            .ok_or_else(|| HistorySourceError::Empty(ticker.to_string()))?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| HistorySourceError::BadResponse("missing quote block".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, ts) in timestamps.iter().enumerate() {
            // Rows with a missing close are skipped entirely.
            let Some(close) = column(&quote.close, i) else { continue };

            let date = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| HistorySourceError::Parse("bad timestamp".into()))?
                .date_naive();

            bars.push(PriceBar {
                date,
                open: column(&quote.open, i).unwrap_or(close),
                high: column(&quote.high, i).unwrap_or(close),
                low: column(&quote.low, i).unwrap_or(close),
                close,
                volume: column(&quote.volume, i).unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(HistorySourceError::Empty(ticker.to_string()));
        }

        bars.sort_by_key(|b| b.date);

        Ok(bars)
    }

    async fn fetch_issuer_metadata(
        &self,
        ticker: &str,
    ) -> Result<IssuerMetadata, HistorySourceError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{ticker}?modules=price,summaryDetail"
        );

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HistorySourceError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(HistorySourceError::RateLimited);
        }

        let body = resp
            .json::<SummaryResponse>()
            .await
            .map_err(|e| HistorySourceError::Parse(e.to_string()))?;

        // Partial or missing metadata is normal; default to all-None.
        let result = body
            .quote_summary
            .result
            .and_then(|mut r| r.pop())
            .unwrap_or_default();

        let price = result.price.unwrap_or_default();
        let detail = result.summary_detail.unwrap_or_default();

        Ok(IssuerMetadata {
            long_name: price.long_name,
            trailing_pe: detail.trailing_pe.and_then(|v| v.raw),
            dividend_yield: detail.dividend_yield.and_then(|v| v.raw),
            market_cap: price.market_cap.and_then(|v| v.raw),
        })
    }
}
