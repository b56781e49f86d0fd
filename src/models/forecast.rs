use serde::{Deserialize, Serialize};

/// Which strategy produced a forecast, so callers can weigh how much to
/// trust it. Serialized names match the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastMethod {
    #[serde(rename = "LSTM Neural Network")]
    SequenceModel,
    #[serde(rename = "Moving Average Trend")]
    MovingAverage,
}

/// One predicted calendar day. Forecast dates are consecutive calendar days
/// after the last observed bar; weekends and holidays are not skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    /// Percent change from current price to the last predicted price.
    pub expected_change: f64,
    pub trend: Trend,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub ticker: String,
    pub company_name: String,
    pub current_price: f64,
    pub predictions: Vec<PredictionPoint>,
    pub summary: ForecastSummary,
    pub method: ForecastMethod,
    pub success: bool,
}
