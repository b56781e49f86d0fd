use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::models::{RiskAnswers, RiskProfile};
use crate::services::risk_profile_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/risk-profile", post(assess))
}

/// POST /api/risk-profile
///
/// Scores the questionnaire into a named risk profile. Always succeeds:
/// missing answers fall back to the balanced default.
pub async fn assess(Json(answers): Json<RiskAnswers>) -> Json<RiskProfile> {
    info!("POST /risk-profile");
    Json(risk_profile_service::assess_risk_profile(&answers))
}
