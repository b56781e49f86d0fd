use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::external::history_source::{HistorySource, HistorySourceError};
use crate::models::{IssuerMetadata, PriceBar};

/// In-process history source. Serves canned series registered by tests, or
/// random-walk series generated on first access when running in mock mode
/// without fixtures.
pub struct MockHistorySource {
    series: Mutex<HashMap<String, Vec<PriceBar>>>,
    metadata: Mutex<HashMap<String, IssuerMetadata>>,
    /// When true, unknown tickers get a generated random walk instead of an
    /// Empty error.
    generate_missing: bool,
}

impl MockHistorySource {
    pub fn new() -> Self {
        Self {
            series: Mutex::new(HashMap::new()),
            metadata: Mutex::new(HashMap::new()),
            generate_missing: false,
        }
    }

    /// Dev-mode source: every ticker resolves to a generated series.
    pub fn generating() -> Self {
        Self {
            generate_missing: true,
            ..Self::new()
        }
    }

    pub fn with_series(self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.series.lock().unwrap().insert(ticker.to_string(), bars);
        self
    }

    pub fn with_metadata(self, ticker: &str, metadata: IssuerMetadata) -> Self {
        self.metadata
            .lock()
            .unwrap()
            .insert(ticker.to_string(), metadata);
        self
    }

    /// A ~2% daily random walk starting at 100, ascending by date, ending
    /// today. Weekends are not skipped; the consumers don't care.
    pub fn random_walk(days: usize) -> Vec<PriceBar> {
        let today = Utc::now().date_naive();
        let mut current = 100.0_f64;
        let mut bars = Vec::with_capacity(days);

        for i in (0..days).rev() {
            current *= 1.0 + (rand::random::<f64>() - 0.5) * 0.02;
            bars.push(PriceBar::close_only(
                today - ChronoDuration::days(i as i64),
                current,
            ));
        }

        bars
    }

    /// Deterministic constant-growth series for closed-form assertions.
    pub fn constant_growth(start: NaiveDate, first_close: f64, daily_return: f64, days: usize) -> Vec<PriceBar> {
        let mut close = first_close;
        let mut bars = Vec::with_capacity(days);

        for i in 0..days {
            bars.push(PriceBar::close_only(start + ChronoDuration::days(i as i64), close));
            close *= 1.0 + daily_return;
        }

        bars
    }
}

impl Default for MockHistorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistorySource for MockHistorySource {
    async fn fetch_history(
        &self,
        ticker: &str,
        _years: u32,
    ) -> Result<Vec<PriceBar>, HistorySourceError> {
        let mut series = self.series.lock().unwrap();

        if let Some(bars) = series.get(ticker) {
            return Ok(bars.clone());
        }

        if self.generate_missing {
            let bars = Self::random_walk(400);
            series.insert(ticker.to_string(), bars.clone());
            return Ok(bars);
        }

        Err(HistorySourceError::Empty(ticker.to_string()))
    }

    async fn fetch_issuer_metadata(
        &self,
        ticker: &str,
    ) -> Result<IssuerMetadata, HistorySourceError> {
        Ok(self
            .metadata
            .lock()
            .unwrap()
            .get(ticker)
            .cloned()
            .unwrap_or_default())
    }
}
