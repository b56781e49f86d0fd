use serde::Deserialize;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Which history source to wire in: "yahoo" or "mock".
    pub history_source: String,
    /// Path to the serialized forecast model. Absence is a normal condition.
    pub model_path: String,
    pub default_lookback_years: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            history_source: std::env::var("HISTORY_SOURCE")
                .unwrap_or_else(|_| "yahoo".to_string()),
            model_path: std::env::var("FORECAST_MODEL_PATH")
                .unwrap_or_else(|_| "model/stock_forecast_model.json".to_string()),
            default_lookback_years: std::env::var("DEFAULT_LOOKBACK_YEARS")
                .ok()
                .and_then(|y| y.parse().ok())
                .unwrap_or(5),
        }
    }
}

/// Qualitative traits used when picking a rationale template for a
/// recommended stock.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StockTraits {
    #[serde(default)]
    pub blue_chip: bool,
    #[serde(default)]
    pub dividend: bool,
    #[serde(default)]
    pub growth: bool,
    #[serde(default)]
    pub defensive: bool,
}

/// One entry in the candidate universe: a liquid, widely-held ticker the
/// recommender may fall back to or rank against a portfolio.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateStock {
    pub ticker: String,
    pub sector: String,
    #[serde(default)]
    pub traits: StockTraits,
}

/// Immutable recommender configuration injected at startup. Keeping the
/// universe as data rather than process-wide constants lets tests swap in a
/// synthetic universe.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub candidates: Vec<CandidateStock>,
}

impl RecommenderConfig {
    /// Sector for a known ticker, if the universe covers it.
    pub fn sector_of(&self, ticker: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.ticker == ticker)
            .map(|c| c.sector.as_str())
    }

    /// The default NSE large-cap universe.
    pub fn default_nse() -> Self {
        fn entry(ticker: &str, sector: &str, traits: StockTraits) -> CandidateStock {
            CandidateStock {
                ticker: ticker.to_string(),
                sector: sector.to_string(),
                traits,
            }
        }

        let blue_chip = StockTraits { blue_chip: true, ..Default::default() };
        let dividend = StockTraits { dividend: true, ..Default::default() };
        let growth = StockTraits { growth: true, ..Default::default() };

        Self {
            candidates: vec![
                entry("RELIANCE.NS", "Energy", blue_chip),
                entry("TCS.NS", "IT", StockTraits { blue_chip: true, dividend: true, ..Default::default() }),
                entry("INFY.NS", "IT", dividend),
                entry("HDFCBANK.NS", "Banking", blue_chip),
                entry("ICICIBANK.NS", "Banking", growth),
                entry("SBIN.NS", "Banking", StockTraits::default()),
                entry("BHARTIARTL.NS", "Telecom", growth),
                entry("WIPRO.NS", "IT", dividend),
                entry("BAJFINANCE.NS", "Financial Services", growth),
                entry("ITC.NS", "Consumer Goods", StockTraits { dividend: true, defensive: true, ..Default::default() }),
                entry("TATAMOTORS.NS", "Automobile", growth),
                entry("MARUTI.NS", "Automobile", StockTraits::default()),
                entry("HINDUNILVR.NS", "Consumer Goods", StockTraits { blue_chip: true, defensive: true, ..Default::default() }),
                entry("ASIANPAINT.NS", "Consumer Goods", blue_chip),
                entry("AXISBANK.NS", "Banking", StockTraits::default()),
            ],
        }
    }
}
