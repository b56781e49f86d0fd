use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar. Histories are ascending by date; calendar gaps from
/// non-trading days are expected and never backfilled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Convenience constructor for series where only the close matters.
    pub fn close_only(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Issuer metadata as reported by the market-data provider. Every field is
/// independently optional; absence is surfaced to callers, never defaulted.
#[derive(Debug, Clone, Default)]
pub struct IssuerMetadata {
    pub long_name: Option<String>,
    pub trailing_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
}
