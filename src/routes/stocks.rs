use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{ComparisonInsights, ComparisonResponse, MetricsBundle, RiskMeter};
use crate::services::metrics_service;
use crate::state::AppState;

const MAX_LOOKBACK_YEARS: u32 = 20;
const MAX_COMPARE_TICKERS: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stock/:ticker", get(get_stock))
        .route("/compare", get(compare_stocks))
}

#[derive(Debug, Deserialize)]
struct StockQuery {
    years: Option<u32>,
}

/// GET /api/stock/:ticker?years=5
///
/// Full metrics bundle for one ticker, with a plain-language summary
/// attached for beginner-facing clients.
pub async fn get_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<StockQuery>,
) -> Result<Json<MetricsBundle>, AppError> {
    let years = query.years.unwrap_or(state.config.default_lookback_years);
    info!("GET /stock/{} - years={}", ticker, years);

    if years == 0 || years > MAX_LOOKBACK_YEARS {
        return Err(AppError::Validation(format!(
            "years must be between 1 and {MAX_LOOKBACK_YEARS}"
        )));
    }

    let mut bundle =
        metrics_service::get_stock_metrics(state.history_source.as_ref(), &ticker, years).await?;
    bundle.friendly_message = Some(friendly_message(&bundle));

    Ok(Json(bundle))
}

#[derive(Debug, Deserialize)]
struct CompareQuery {
    /// Comma-separated tickers.
    tickers: String,
    years: Option<u32>,
}

/// GET /api/compare?tickers=TCS,INFY&years=5
///
/// Metrics bundles for several tickers side by side. A ticker that cannot
/// be fetched or computed is dropped rather than failing the whole
/// comparison; the response errors only when nothing survives.
pub async fn compare_stocks(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let years = query.years.unwrap_or(state.config.default_lookback_years);
    if years == 0 || years > MAX_LOOKBACK_YEARS {
        return Err(AppError::Validation(format!(
            "years must be between 1 and {MAX_LOOKBACK_YEARS}"
        )));
    }

    let tickers: Vec<&str> = query
        .tickers
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    info!("GET /compare - {} tickers, years={}", tickers.len(), years);

    if tickers.is_empty() {
        return Err(AppError::Validation("No tickers provided".to_string()));
    }
    if tickers.len() > MAX_COMPARE_TICKERS {
        return Err(AppError::Validation(format!(
            "At most {MAX_COMPARE_TICKERS} tickers can be compared at once"
        )));
    }

    let mut stocks = Vec::new();
    for ticker in tickers {
        match metrics_service::get_stock_metrics(state.history_source.as_ref(), ticker, years).await
        {
            Ok(bundle) => stocks.push(bundle),
            Err(e) => warn!("Dropping {} from comparison: {}", ticker, e),
        }
    }

    if stocks.is_empty() {
        return Err(AppError::Upstream(
            "No data available for any requested ticker".to_string(),
        ));
    }

    let comparison = (stocks.len() >= 2).then(|| build_insights(&stocks));

    Ok(Json(ComparisonResponse {
        count: stocks.len(),
        stocks,
        comparison,
        success: true,
    }))
}

fn build_insights(stocks: &[MetricsBundle]) -> ComparisonInsights {
    // Ties resolve to the earlier ticker in request order.
    let best = stocks
        .iter()
        .max_by(|a, b| a.returns.cagr.total_cmp(&b.returns.cagr))
        .unwrap();
    let safest = stocks
        .iter()
        .min_by(|a, b| a.risk.fluctuation.total_cmp(&b.risk.fluctuation))
        .unwrap();

    ComparisonInsights {
        best_performer: best.ticker.clone(),
        safest_option: safest.ticker.clone(),
        summary: format!(
            "{} grew the fastest at {:.2}% a year, while {} moved the least.",
            best.company_name, best.returns.cagr, safest.company_name
        ),
    }
}

/// One-paragraph plain-language rendering of a bundle, deterministic in its
/// inputs.
fn friendly_message(bundle: &MetricsBundle) -> String {
    let risk_clause = match bundle.risk.meter {
        RiskMeter::Safe => "It has been a steady, low-risk stock.",
        RiskMeter::ModerateRisk => "Expect some ups and downs along the way.",
        RiskMeter::HighRisk => "It swings a lot, so be ready for sharp moves.",
    };

    format!(
        "{} would have turned 10,000 into about {:.0} over the last {:.1} years. {}",
        bundle.company_name, bundle.returns.projection, bundle.returns.effective_years, risk_clause
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ChartData, Fundamentals, ReturnsMetrics, RiskLevel, RiskMetrics, StabilityMetrics,
    };

    fn bundle(ticker: &str, cagr: f64, fluctuation: f64) -> MetricsBundle {
        MetricsBundle {
            ticker: ticker.to_string(),
            company_name: ticker.trim_end_matches(".NS").to_string(),
            latest_price: 100.0,
            returns: ReturnsMetrics {
                absolute: cagr * 5.0,
                cagr,
                projection: 10_000.0 * (1.0 + cagr * 5.0 / 100.0),
                effective_years: 5.0,
            },
            risk: RiskMetrics {
                fluctuation,
                level: RiskLevel::Medium,
                meter: RiskMeter::ModerateRisk,
            },
            stability: StabilityMetrics { score: 1.0, stars: 4 },
            fundamentals: Fundamentals {
                pe_ratio: None,
                dividend_yield: None,
                market_cap: None,
            },
            chart_data: ChartData { dates: vec![], prices: vec![] },
            friendly_message: None,
            success: true,
        }
    }

    #[test]
    fn insights_pick_fastest_grower_and_least_volatile() {
        let stocks = vec![
            bundle("A.NS", 18.0, 25.0),
            bundle("B.NS", 9.0, 12.0),
            bundle("C.NS", 14.0, 31.0),
        ];

        let insights = build_insights(&stocks);
        assert_eq!(insights.best_performer, "A.NS");
        assert_eq!(insights.safest_option, "B.NS");
        assert!(insights.summary.contains("A"));
        assert!(insights.summary.contains("B"));
    }

    #[test]
    fn friendly_message_names_company_and_risk() {
        let b = bundle("TCS.NS", 12.0, 14.0);
        let message = friendly_message(&b);

        assert!(message.contains("TCS"));
        assert!(message.contains("ups and downs"));
    }
}
