use serde::{Deserialize, Serialize};

/// Growth over the lookback window.
///
/// `effective_years` is the lookback actually used: when the requested window
/// exceeds available history the past-price index clamps to the earliest bar,
/// and the shorter effective window is reported so CAGR stays interpretable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsMetrics {
    pub absolute: f64,
    pub cagr: f64,
    /// What 10,000 invested at the start of the window would be worth now.
    pub projection: f64,
    pub effective_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskMeter {
    Safe,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Annualized volatility as a percentage.
    pub fluctuation: f64,
    pub level: RiskLevel,
    pub meter: RiskMeter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityMetrics {
    /// Sharpe-like risk-adjusted-return proxy.
    pub score: f64,
    /// 1 to 5.
    pub stars: u8,
}

/// Fundamentals from issuer metadata. Each field is independently optional
/// and serializes as `null` when the provider did not report it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub pe_ratio: Option<f64>,
    /// Percentage.
    pub dividend_yield: Option<f64>,
    /// Reported in Crore (tens of millions of currency units).
    pub market_cap: Option<f64>,
}

/// Last 30 trading days of closes, ascending, for sparkline rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
}

/// The full per-ticker metrics bundle. Computed fresh on every request and
/// never mutated or cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBundle {
    pub ticker: String,
    pub company_name: String,
    pub latest_price: f64,
    pub returns: ReturnsMetrics,
    pub risk: RiskMetrics,
    pub stability: StabilityMetrics,
    pub fundamentals: Fundamentals,
    pub chart_data: ChartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_message: Option<String>,
    pub success: bool,
}

/// Response for the multi-ticker comparison endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub stocks: Vec<MetricsBundle>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonInsights>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonInsights {
    pub best_performer: String,
    pub safest_option: String,
    pub summary: String,
}
