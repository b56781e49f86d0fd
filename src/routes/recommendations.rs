use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{RecommendRequest, RecommendationSet};
use crate::services::recommendation_service::{self, DEFAULT_MAX_RECOMMENDATIONS};
use crate::state::AppState;

const MAX_RECOMMENDATIONS_CAP: usize = 10;

pub fn router() -> Router<AppState> {
    Router::new().route("/recommend", post(recommend))
}

/// POST /api/recommend
///
/// Correlation-driven recommendations for a portfolio of tickers, with a
/// popular-stock fallback whenever the analysis cannot run.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationSet>, AppError> {
    let max = request
        .max_recommendations
        .unwrap_or(DEFAULT_MAX_RECOMMENDATIONS);

    info!(
        "POST /recommend - {} holdings, max={}",
        request.portfolio.len(),
        max
    );

    if max == 0 || max > MAX_RECOMMENDATIONS_CAP {
        return Err(AppError::Validation(format!(
            "maxRecommendations must be between 1 and {MAX_RECOMMENDATIONS_CAP}"
        )));
    }

    let result = recommendation_service::get_recommendations(
        state.history_source.as_ref(),
        &state.recommender,
        &request.portfolio,
        max,
    )
    .await?;

    Ok(Json(result))
}
