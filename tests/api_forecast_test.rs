mod common;

use chrono::NaiveDate;
use equity_insight_backend::external::mock::MockHistorySource;

const DAILY_RETURN: f64 = 0.002;

fn growth_source() -> MockHistorySource {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    MockHistorySource::new().with_series(
        "GROW.NS",
        MockHistorySource::constant_growth(start, 100.0, DAILY_RETURN, 300),
    )
}

#[tokio::test]
async fn fallback_forecast_compounds_the_trailing_return() {
    let (status, body) =
        common::get(common::test_app(growth_source()), "/api/predict/GROW?days=10").await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["ticker"], "GROW.NS");
    // No model artifact is loaded, so the statistical fallback answers.
    assert_eq!(body["method"], "Moving Average Trend");

    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 10);

    // Constant daily return r makes the forecast exactly geometric:
    // predicted[h] = current * (1 + r)^h, up to 2-decimal rounding.
    let current = body["currentPrice"].as_f64().unwrap();
    for (i, point) in predictions.iter().enumerate() {
        let expected = current * (1.0 + DAILY_RETURN).powi(i as i32 + 1);
        let got = point["price"].as_f64().unwrap();
        assert!((got - expected).abs() < 0.02, "day {i}: {got} vs {expected}");
    }

    assert_eq!(body["summary"]["trend"], "up");
    let expected_change = ((1.0 + DAILY_RETURN).powi(10) - 1.0) * 100.0;
    let got_change = body["summary"]["expectedChange"].as_f64().unwrap();
    assert!((got_change - expected_change).abs() < 0.02);
    assert!(body["summary"]["message"].as_str().unwrap().contains("may go up"));
}

#[tokio::test]
async fn forecast_dates_continue_from_the_last_bar() {
    let (status, body) =
        common::get(common::test_app(growth_source()), "/api/predict/GROW?days=3").await;

    assert_eq!(status, 200);

    // 300 consecutive days from 2024-01-01 end on 2024-10-26.
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions[0]["date"], "2024-10-27");
    assert_eq!(predictions[2]["date"], "2024-10-29");
}

#[tokio::test]
async fn forecast_defaults_to_thirty_days() {
    let (status, body) =
        common::get(common::test_app(growth_source()), "/api/predict/GROW").await;

    assert_eq!(status, 200);
    assert_eq!(body["predictions"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn forecast_rejects_bad_horizons() {
    for uri in ["/api/predict/GROW?days=0", "/api/predict/GROW?days=400"] {
        let (status, body) = common::get(common::test_app(growth_source()), uri).await;
        assert_eq!(status, 400);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn forecast_needs_enough_history() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let source = MockHistorySource::new().with_series(
        "NEW.NS",
        MockHistorySource::constant_growth(start, 50.0, DAILY_RETURN, 50),
    );

    let (status, body) = common::get(common::test_app(source), "/api/predict/NEW").await;

    assert_eq!(status, 422);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Insufficient"));
}
