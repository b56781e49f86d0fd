use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::errors::AppError;
use crate::external::history_source::{normalize_ticker, HistorySource};
use crate::models::{
    ForecastMethod, ForecastResult, ForecastSummary, PredictionPoint, PriceBar, Trend,
};
use crate::services::history_service;
use crate::services::metrics_service::{daily_returns, mean, round2};
use crate::services::sequence_model::{MinMaxScaler, Predictor, SEQ_WINDOW};

/// Forecasts need two calendar years of bars and at least this many points.
const MIN_FORECAST_POINTS: usize = 100;
const FORECAST_LOOKBACK_YEARS: u32 = 2;

/// Forecast `horizon_days` of prices for one ticker. Uses the learned
/// sequence model when one is available and falls back to a moving-average
/// trend otherwise; the fallback also covers a degenerate (flat) close
/// series, where min-max scaling is undefined.
pub async fn predict_stock(
    source: &dyn HistorySource,
    model: Option<&dyn Predictor>,
    ticker: &str,
    horizon_days: usize,
) -> Result<ForecastResult, AppError> {
    if horizon_days == 0 {
        return Err(AppError::Validation("forecast horizon must be at least 1 day".to_string()));
    }

    let symbol = normalize_ticker(ticker);
    let history = history_service::fetch_history(source, &symbol, FORECAST_LOOKBACK_YEARS).await?;

    if history.len() < MIN_FORECAST_POINTS {
        return Err(AppError::InsufficientData(format!(
            "Insufficient historical data for {symbol}: {} points, need {MIN_FORECAST_POINTS}",
            history.len()
        )));
    }

    let metadata = history_service::fetch_metadata(source, &symbol).await;
    let company_name = history_service::display_name(&metadata, &symbol);

    let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
    let current_price = *closes.last().unwrap();
    let last_date = history.last().unwrap().date;

    let (prices, method) = match model.and_then(|m| model_forecast(m, &closes, horizon_days)) {
        Some(prices) => (prices, ForecastMethod::SequenceModel),
        None => (
            moving_average_forecast(&closes, current_price, horizon_days),
            ForecastMethod::MovingAverage,
        ),
    };

    info!(
        "Forecast for {} over {} days via {:?}",
        symbol, horizon_days, method
    );

    Ok(build_result(
        symbol,
        company_name,
        current_price,
        last_date,
        prices,
        method,
        horizon_days,
    ))
}

/// Strategy A: autoregressive multi-step forecast through the sequence
/// model. The seed is the last 60 normalized closes; each step feeds the
/// model one window, appends its prediction, and slides forward by one so
/// later steps consume earlier predictions. Returns None when the series
/// cannot be scaled or is shorter than the seed window.
pub fn model_forecast(
    model: &dyn Predictor,
    closes: &[f64],
    horizon_days: usize,
) -> Option<Vec<f64>> {
    if closes.len() < SEQ_WINDOW {
        return None;
    }

    let scaler = MinMaxScaler::fit(closes)?;

    let mut window: Vec<f64> = closes[closes.len() - SEQ_WINDOW..]
        .iter()
        .map(|&c| scaler.transform(c))
        .collect();

    let mut scaled_predictions = Vec::with_capacity(horizon_days);

    for _ in 0..horizon_days {
        let next = model.predict(&window);
        scaled_predictions.push(next);
        window.remove(0);
        window.push(next);
    }

    Some(scaled_predictions.into_iter().map(|s| scaler.inverse(s)).collect())
}

/// Strategy B: take the mean daily return over a trailing window of
/// `min(30, len/4)` days as a constant expected rate and compound the
/// current price forward geometrically.
pub fn moving_average_forecast(
    closes: &[f64],
    current_price: f64,
    horizon_days: usize,
) -> Vec<f64> {
    let returns = daily_returns(closes);
    let window = (closes.len() / 4).min(30).max(1);
    let start = returns.len().saturating_sub(window);
    let avg_daily_return = mean(&returns[start..]);

    let mut prices = Vec::with_capacity(horizon_days);
    let mut next = current_price;

    for _ in 0..horizon_days {
        next *= 1.0 + avg_daily_return;
        prices.push(next);
    }

    prices
}

fn build_result(
    ticker: String,
    company_name: String,
    current_price: f64,
    last_date: NaiveDate,
    prices: Vec<f64>,
    method: ForecastMethod,
    horizon_days: usize,
) -> ForecastResult {
    // Prediction dates are consecutive calendar days; weekends are not
    // skipped.
    let predictions: Vec<PredictionPoint> = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PredictionPoint {
            date: (last_date + Duration::days(i as i64 + 1))
                .format("%Y-%m-%d")
                .to_string(),
            price: round2(price),
        })
        .collect();

    let last_predicted = *prices.last().unwrap_or(&current_price);
    let expected_change = round2((last_predicted / current_price - 1.0) * 100.0);
    let trend = if expected_change > 0.0 { Trend::Up } else { Trend::Down };
    let direction = match trend {
        Trend::Up => "up",
        Trend::Down => "down",
    };

    let message = match method {
        ForecastMethod::SequenceModel => format!(
            "Our model predicts {company_name} will go {direction} by {:.2}% in the next {horizon_days} days.",
            expected_change.abs()
        ),
        ForecastMethod::MovingAverage => format!(
            "Based on recent trends, {company_name} may go {direction} by {:.2}% in the next {horizon_days} days.",
            expected_change.abs()
        ),
    };

    ForecastResult {
        ticker,
        company_name,
        current_price: round2(current_price),
        predictions,
        summary: ForecastSummary {
            expected_change,
            trend,
            message,
        },
        method,
        success: true,
    }
}
