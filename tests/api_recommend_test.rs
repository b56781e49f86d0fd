mod common;

use chrono::{Duration, NaiveDate};
use equity_insight_backend::external::mock::MockHistorySource;
use equity_insight_backend::models::PriceBar;
use serde_json::json;

fn series_from(f: impl Fn(usize) -> f64, days: usize) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..days)
        .map(|i| PriceBar::close_only(start + Duration::days(i as i64), f(i)))
        .collect()
}

/// Portfolio plus the first four default candidates, 100 shared trading
/// days, with correlations against RELIANCE engineered so TCS ranks first
/// and INFY second.
fn correlated_source() -> MockHistorySource {
    let days = 100;
    MockHistorySource::new()
        .with_series("RELIANCE.NS", series_from(|i| 100.0 + i as f64, days))
        // Perfect positive correlation.
        .with_series("TCS.NS", series_from(|i| 200.0 + 2.0 * i as f64, days))
        // Strong but imperfect positive correlation.
        .with_series(
            "INFY.NS",
            series_from(|i| 100.0 + i as f64 + (i as f64 / 20.0).powi(2), days),
        )
        // Perfect negative correlation.
        .with_series("HDFCBANK.NS", series_from(|i| 400.0 - i as f64, days))
        // Roughly uncorrelated oscillation.
        .with_series(
            "ICICIBANK.NS",
            series_from(|i| 150.0 + if i % 2 == 0 { 5.0 } else { -5.0 }, days),
        )
}

#[tokio::test]
async fn correlation_path_ranks_and_diversifies() {
    let (status, body) = common::post_json(
        common::test_app(correlated_source()),
        "/api/recommend",
        json!({ "portfolio": ["RELIANCE"] }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["note"], "Based on price correlation analysis");
    assert_eq!(body["portfolio"], json!(["RELIANCE.NS"]));

    // Top two correlates of the single holding, strongest first.
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["ticker"], "TCS.NS");
    assert_eq!(recs[1]["ticker"], "INFY.NS");

    let first = recs[0]["correlation"].as_f64().unwrap();
    let second = recs[1]["correlation"].as_f64().unwrap();
    assert!(first >= second);
    assert!(first > 0.99);

    for rec in recs {
        assert_ne!(rec["ticker"], "RELIANCE.NS");
        assert!(rec["relationship"]
            .as_str()
            .unwrap()
            .contains("similar pattern"));
        assert!(!rec["reason"].as_str().unwrap().is_empty());
    }

    // Single Energy holding, so both IT picks flag a missing sector.
    assert!(recs[0]["reason"].as_str().unwrap().contains("IT sector"));
}

#[tokio::test]
async fn short_histories_fall_back_to_popular_stocks() {
    // Ten shared days is below the alignment minimum.
    let days = 10;
    let source = MockHistorySource::new()
        .with_series("RELIANCE.NS", series_from(|i| 100.0 + i as f64, days))
        .with_series("TCS.NS", series_from(|i| 200.0 + i as f64, days))
        .with_series("INFY.NS", series_from(|i| 300.0 + i as f64, days))
        .with_series("HDFCBANK.NS", series_from(|i| 400.0 + i as f64, days))
        .with_series("ICICIBANK.NS", series_from(|i| 500.0 + i as f64, days));

    let (status, body) = common::post_json(
        common::test_app(source),
        "/api/recommend",
        json!({ "portfolio": ["RELIANCE"] }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["note"], "Based on popular stocks");

    // First three universe entries that are not already held.
    let recs = body["recommendations"].as_array().unwrap();
    let tickers: Vec<&str> = recs.iter().map(|r| r["ticker"].as_str().unwrap()).collect();
    assert_eq!(tickers, vec!["TCS.NS", "INFY.NS", "HDFCBANK.NS"]);

    for rec in recs {
        assert_eq!(rec.get("correlation"), None);
        assert_eq!(rec.get("relationship"), None);
        assert!(!rec["reason"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn unfetchable_portfolio_falls_back_too() {
    let (status, body) = common::post_json(
        common::test_app(MockHistorySource::new()),
        "/api/recommend",
        json!({ "portfolio": ["GHOST"], "maxRecommendations": 2 }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["note"], "Based on popular stocks");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_portfolio_is_rejected() {
    let (status, body) = common::post_json(
        common::test_app(MockHistorySource::new()),
        "/api/recommend",
        json!({ "portfolio": ["  ", ""] }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("portfolio"));
}

#[tokio::test]
async fn max_recommendations_is_bounded() {
    let (status, body) = common::post_json(
        common::test_app(MockHistorySource::new()),
        "/api/recommend",
        json!({ "portfolio": ["TCS"], "maxRecommendations": 50 }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}
