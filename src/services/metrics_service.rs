use tracing::info;

use crate::errors::AppError;
use crate::external::history_source::{normalize_ticker, HistorySource};
use crate::models::{
    ChartData, Fundamentals, IssuerMetadata, MetricsBundle, PriceBar, ReturnsMetrics, RiskLevel,
    RiskMeter, RiskMetrics, StabilityMetrics,
};
use crate::services::history_service;

/// Approximate Indian risk-free rate, in percent, used as the stability
/// baseline.
const RISK_FREE_RATE: f64 = 6.0;

const TRADING_DAYS_PER_YEAR: usize = 252;

/// Ten million currency units; market caps are reported in Crore.
const CRORE: f64 = 10_000_000.0;

const CHART_DAYS: usize = 30;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Daily simple returns of a close series; one element shorter than the
/// input.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

pub fn absolute_return_pct(latest: f64, past: f64) -> f64 {
    (latest / past - 1.0) * 100.0
}

pub fn cagr_pct(latest: f64, past: f64, years: f64) -> f64 {
    ((latest / past).powf(1.0 / years) - 1.0) * 100.0
}

/// Annualized volatility of a daily-return series, in percent.
pub fn annualized_volatility_pct(returns: &[f64]) -> f64 {
    std_dev(returns) * (TRADING_DAYS_PER_YEAR as f64).sqrt() * 100.0
}

/// Sharpe-like stability score. A flat price series has zero variance and no
/// meaningful risk-adjusted return, which is a computation failure rather
/// than a divide-by-zero.
pub fn stability_score(returns: &[f64]) -> Result<f64, AppError> {
    let daily_std = std_dev(returns);
    // Tolerance absorbs float noise in constant-ratio series
    if daily_std < 1e-12 {
        return Err(AppError::Computation(
            "zero-variance price series has no stability score".to_string(),
        ));
    }

    // Numerator is in percent while the denominator stays a fraction; the
    // star ladder thresholds are calibrated to exactly this scale.
    let avg_annual_return_pct = mean(returns) * TRADING_DAYS_PER_YEAR as f64 * 100.0;
    Ok((avg_annual_return_pct - RISK_FREE_RATE) / (daily_std * (TRADING_DAYS_PER_YEAR as f64).sqrt()))
}

/// Reliability stars. Ordered first-match ladder over literal score bands;
/// a score above the 4-star band paired with high volatility falls through
/// to 1 star.
pub fn star_rating(score: f64, volatility_pct: f64) -> u8 {
    if score >= 1.5 && volatility_pct < 15.0 {
        5
    } else if (1.0..=1.5).contains(&score) {
        4
    } else if (0.5..1.0).contains(&score) {
        3
    } else if (0.0..0.5).contains(&score) {
        2
    } else {
        1
    }
}

/// Risk ladder on annualized volatility: below 15 is Low/Safe, 15 through 30
/// inclusive is Medium, above 30 is High.
pub fn risk_rating(volatility_pct: f64) -> (RiskLevel, RiskMeter) {
    if volatility_pct < 15.0 {
        (RiskLevel::Low, RiskMeter::Safe)
    } else if volatility_pct <= 30.0 {
        (RiskLevel::Medium, RiskMeter::ModerateRisk)
    } else {
        (RiskLevel::High, RiskMeter::HighRisk)
    }
}

fn build_fundamentals(metadata: &IssuerMetadata) -> Fundamentals {
    Fundamentals {
        pe_ratio: metadata.trailing_pe.map(round2),
        dividend_yield: metadata.dividend_yield.map(|y| round2(y * 100.0)),
        market_cap: metadata.market_cap.map(|c| round2(c / CRORE)),
    }
}

fn build_chart_data(history: &[PriceBar]) -> ChartData {
    let start = history.len().saturating_sub(CHART_DAYS);
    let recent = &history[start..];

    ChartData {
        dates: recent.iter().map(|b| b.date.format("%Y-%m-%d").to_string()).collect(),
        prices: recent.iter().map(|b| round2(b.close)).collect(),
    }
}

/// Compute the full metrics bundle from a price history. Pure function of
/// its inputs; all failures are structured errors.
pub fn compute_metrics(
    history: &[PriceBar],
    ticker: &str,
    metadata: &IssuerMetadata,
    lookback_years: u32,
) -> Result<MetricsBundle, AppError> {
    if history.len() < history_service::MIN_HISTORY_POINTS {
        return Err(AppError::InsufficientData(format!(
            "Insufficient data for {ticker}: {} trading days",
            history.len()
        )));
    }
    if lookback_years == 0 {
        return Err(AppError::Validation("lookback must be at least 1 year".to_string()));
    }

    let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
    let latest_price = *closes.last().unwrap_or(&0.0);

    // Clamped, not interpolated: a window longer than the history uses the
    // earliest available bar.
    let past_idx = closes
        .len()
        .saturating_sub(TRADING_DAYS_PER_YEAR * lookback_years as usize);
    let past_price = closes[past_idx];

    if past_price <= 0.0 {
        return Err(AppError::Computation(format!(
            "non-positive base price {past_price} for {ticker}"
        )));
    }

    let absolute = absolute_return_pct(latest_price, past_price);
    let cagr = cagr_pct(latest_price, past_price, lookback_years as f64);
    let effective_years = (closes.len() - past_idx) as f64 / TRADING_DAYS_PER_YEAR as f64;

    let returns = daily_returns(&closes);
    let volatility = annualized_volatility_pct(&returns);
    let score = stability_score(&returns)?;

    let (level, meter) = risk_rating(volatility);

    Ok(MetricsBundle {
        ticker: ticker.to_string(),
        company_name: history_service::display_name(metadata, ticker),
        latest_price: round2(latest_price),
        returns: ReturnsMetrics {
            absolute: round2(absolute),
            cagr: round2(cagr),
            projection: round2(10_000.0 * (1.0 + absolute / 100.0)),
            effective_years: round2(effective_years),
        },
        risk: RiskMetrics {
            fluctuation: round2(volatility),
            level,
            meter,
        },
        stability: StabilityMetrics {
            score: round2(score),
            stars: star_rating(score, volatility),
        },
        fundamentals: build_fundamentals(metadata),
        chart_data: build_chart_data(history),
        friendly_message: None,
        success: true,
    })
}

/// Fetch history and metadata for one ticker and compute its bundle.
pub async fn get_stock_metrics(
    source: &dyn HistorySource,
    ticker: &str,
    lookback_years: u32,
) -> Result<MetricsBundle, AppError> {
    let symbol = normalize_ticker(ticker);
    info!("Computing metrics for {} over {}y", symbol, lookback_years);

    let history = history_service::fetch_history_for_metrics(source, &symbol, lookback_years).await?;
    let metadata = history_service::fetch_metadata(source, &symbol).await;

    compute_metrics(&history, &symbol, &metadata, lookback_years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mock::MockHistorySource;
    use chrono::NaiveDate;

    fn constant_growth_history(days: usize, daily_return: f64) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        MockHistorySource::constant_growth(start, 100.0, daily_return, days)
    }

    /// Alternating +1% / -0.5% days: positive drift with real variance, so
    /// the full bundle is computable.
    fn alternating_history(days: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut close = 100.0;
        let mut bars = Vec::with_capacity(days);
        for i in 0..days {
            bars.push(PriceBar::close_only(start + chrono::Duration::days(i as i64), close));
            close *= if i % 2 == 0 { 1.01 } else { 0.995 };
        }
        bars
    }

    #[test]
    fn cagr_matches_closed_form_for_constant_return() {
        // 5 trading years at a constant daily return
        let r = 0.0005_f64;
        let n = 1260;
        let history = constant_growth_history(n, r);
        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();

        let expected = ((1.0 + r).powf(1259.0 / 5.0) - 1.0) * 100.0;
        let got = cagr_pct(*closes.last().unwrap(), closes[0], 5.0);
        assert!((got - expected).abs() < 1e-9, "got {got}, expected {expected}");
    }

    #[test]
    fn flat_series_has_zero_volatility_and_no_stability_score() {
        let returns = vec![0.0; 300];
        assert_eq!(annualized_volatility_pct(&returns), 0.0);
        assert!(matches!(stability_score(&returns), Err(AppError::Computation(_))));
    }

    #[test]
    fn star_ladder_boundaries() {
        assert_eq!(star_rating(1.5, 14.0), 5);
        // 1.5 sits at the top of the 4-star band when volatility blocks 5
        assert_eq!(star_rating(1.5, 15.0), 4);
        assert_eq!(star_rating(1.0, 10.0), 4);
        assert_eq!(star_rating(0.99, 10.0), 3);
        assert_eq!(star_rating(0.5, 10.0), 3);
        assert_eq!(star_rating(0.0, 10.0), 2);
        assert_eq!(star_rating(-0.01, 10.0), 1);
        // Above the 4-star band with high volatility falls through
        assert_eq!(star_rating(2.0, 20.0), 1);
    }

    #[test]
    fn risk_ladder_boundaries() {
        assert_eq!(risk_rating(14.99), (RiskLevel::Low, RiskMeter::Safe));
        assert_eq!(risk_rating(15.0), (RiskLevel::Medium, RiskMeter::ModerateRisk));
        assert_eq!(risk_rating(30.0), (RiskLevel::Medium, RiskMeter::ModerateRisk));
        assert_eq!(risk_rating(30.01), (RiskLevel::High, RiskMeter::HighRisk));
    }

    #[test]
    fn lookback_clamps_to_earliest_bar_and_reports_effective_years() {
        // Two years of history against a five-year request
        let history = alternating_history(504);
        let metadata = IssuerMetadata::default();

        let bundle = compute_metrics(&history, "TEST.NS", &metadata, 5).unwrap();
        assert!((bundle.returns.effective_years - 2.0).abs() < 0.01);
    }

    #[test]
    fn doubling_over_five_years_with_zero_variance() {
        // 100 -> 200 over exactly five trading years at a constant rate:
        // absolute return is exactly 100%, CAGR ~14.87%, and the stability
        // score is a computation failure, not NaN.
        let n = 1260;
        let ratio = 2.0_f64.powf(1.0 / (n as f64 - 1.0));
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let history = MockHistorySource::constant_growth(start, 100.0, ratio - 1.0, n);

        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
        let latest = *closes.last().unwrap();
        assert!((latest - 200.0).abs() < 1e-9);

        assert!((absolute_return_pct(latest, closes[0]) - 100.0).abs() < 1e-9);
        assert!((cagr_pct(latest, closes[0], 5.0) - 14.87).abs() < 0.01);

        let returns = daily_returns(&closes);
        // Constant daily ratio: returns are all equal, variance ~0 up to
        // float error, so the stability guard must fire.
        let spread = returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - returns.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!(spread < 1e-12);

        let metadata = IssuerMetadata::default();
        match compute_metrics(&history, "DOUBLER.NS", &metadata, 5) {
            Err(AppError::Computation(_)) => {}
            other => panic!("expected Computation error, got {other:?}"),
        }
    }

    #[test]
    fn fundamentals_pass_through_with_unit_conversions() {
        let metadata = IssuerMetadata {
            long_name: Some("Test Industries".to_string()),
            trailing_pe: Some(24.567),
            dividend_yield: Some(0.0123),
            market_cap: Some(1_500_000_000_000.0),
        };
        let history = alternating_history(300);

        let bundle = compute_metrics(&history, "TEST.NS", &metadata, 1).unwrap();
        assert_eq!(bundle.company_name, "Test Industries");
        assert_eq!(bundle.fundamentals.pe_ratio, Some(24.57));
        assert_eq!(bundle.fundamentals.dividend_yield, Some(1.23));
        assert_eq!(bundle.fundamentals.market_cap, Some(150_000.0));
        assert_eq!(bundle.chart_data.prices.len(), 30);
    }

    #[test]
    fn short_history_is_insufficient() {
        let history = constant_growth_history(100, 0.001);
        let metadata = IssuerMetadata::default();
        assert!(matches!(
            compute_metrics(&history, "TEST.NS", &metadata, 5),
            Err(AppError::InsufficientData(_))
        ));
    }
}
