use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::ForecastResult;
use crate::services::forecast_service;
use crate::services::sequence_model::Predictor;
use crate::state::AppState;

const DEFAULT_HORIZON_DAYS: usize = 30;
const MAX_HORIZON_DAYS: usize = 365;

pub fn router() -> Router<AppState> {
    Router::new().route("/predict/:ticker", get(predict))
}

#[derive(Debug, Deserialize)]
struct PredictQuery {
    days: Option<usize>,
}

/// GET /api/predict/:ticker?days=30
///
/// Price forecast over the requested horizon. The learned model is used when
/// it was loadable at startup, otherwise the moving-average fallback; either
/// way the response names the method used.
pub async fn predict(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<PredictQuery>,
) -> Result<Json<ForecastResult>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_HORIZON_DAYS);
    info!("GET /predict/{} - days={}", ticker, days);

    if days == 0 || days > MAX_HORIZON_DAYS {
        return Err(AppError::Validation(format!(
            "days must be between 1 and {MAX_HORIZON_DAYS}"
        )));
    }

    let model = state
        .forecast_model
        .as_deref()
        .map(|m| m as &dyn Predictor);

    let result =
        forecast_service::predict_stock(state.history_source.as_ref(), model, &ticker, days)
            .await?;

    Ok(Json(result))
}
