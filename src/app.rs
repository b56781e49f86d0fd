use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{forecast, health, recommendations, risk_profile, stocks};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(stocks::router())
        .merge(forecast::router())
        .merge(recommendations::router())
        .merge(risk_profile::router());

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
