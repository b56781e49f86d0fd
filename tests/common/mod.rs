use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use equity_insight_backend::app::create_app;
use equity_insight_backend::config::{AppConfig, RecommenderConfig};
use equity_insight_backend::external::mock::MockHistorySource;
use equity_insight_backend::state::AppState;

/// App wired to a mock history source, the default candidate universe, and
/// no forecast model.
pub fn test_app(source: MockHistorySource) -> Router {
    let config = AppConfig {
        port: 0,
        history_source: "mock".to_string(),
        model_path: "does-not-exist.json".to_string(),
        default_lookback_years: 5,
    };

    create_app(AppState {
        config: Arc::new(config),
        history_source: Arc::new(source),
        recommender: Arc::new(RecommenderConfig::default_nse()),
        forecast_model: None,
    })
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    into_json(response).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    into_json(response).await
}

async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
