use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{info, warn};

use crate::config::{CandidateStock, RecommenderConfig, StockTraits};
use crate::errors::AppError;
use crate::external::history_source::{normalize_ticker, HistorySource};
use crate::models::{PriceBar, Recommendation, RecommendationSet};
use crate::services::history_service;
use crate::services::metrics_service::round2;

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

/// Cap on total series held for the correlation matrix; the portfolio is
/// fetched first and candidates top the pool up to this size.
const MAX_SERIES: usize = 5;

/// The matrix is only trusted with more than this many aligned observations.
const MIN_ALIGNED_OBSERVATIONS: usize = 30;

/// Above this correlation a candidate "moves with" the portfolio; below it
/// the candidate is pitched as diversification.
const SIMILARITY_THRESHOLD: f64 = 0.6;

const LOOKBACK_YEARS: u32 = 5;

/// Recommend stocks for a portfolio from price correlation, degrading to a
/// static popular-stock list whenever the correlation path cannot be
/// trusted. Never errors for a non-empty portfolio.
pub async fn get_recommendations(
    source: &dyn HistorySource,
    config: &RecommenderConfig,
    portfolio: &[String],
    max_recommendations: usize,
) -> Result<RecommendationSet, AppError> {
    let portfolio: Vec<String> = clean_portfolio(portfolio);

    if portfolio.is_empty() {
        return Err(AppError::Validation("No stocks in portfolio".to_string()));
    }

    // Per-ticker fetch failures drop that ticker only.
    let mut series: Vec<(String, Vec<PriceBar>)> = Vec::new();
    for ticker in &portfolio {
        match history_service::fetch_history(source, ticker, LOOKBACK_YEARS).await {
            Ok(bars) => series.push((ticker.clone(), bars)),
            Err(e) => warn!("Skipping portfolio ticker {}: {}", ticker, e),
        }
    }

    // Top up with candidate series so the matrix has non-portfolio tickers
    // to rank, up to the fetch cap.
    for candidate in &config.candidates {
        if series.len() >= MAX_SERIES {
            break;
        }
        if portfolio.contains(&candidate.ticker)
            || series.iter().any(|(t, _)| t == &candidate.ticker)
        {
            continue;
        }
        match history_service::fetch_history(source, &candidate.ticker, LOOKBACK_YEARS).await {
            Ok(bars) => series.push((candidate.ticker.clone(), bars)),
            Err(e) => warn!("Skipping candidate {}: {}", candidate.ticker, e),
        }
    }

    let portfolio_sectors = known_sectors(config, &portfolio);

    if series.len() >= 2 {
        if let Some(recommendations) = correlation_recommendations(
            config,
            &series,
            &portfolio,
            &portfolio_sectors,
            max_recommendations,
        ) {
            info!(
                "Correlation analysis produced {} recommendations for {} holdings",
                recommendations.len(),
                portfolio.len()
            );
            return Ok(RecommendationSet {
                portfolio,
                recommendations,
                success: true,
                note: "Based on price correlation analysis".to_string(),
            });
        }
    }

    Ok(static_fallback(config, portfolio, &portfolio_sectors, max_recommendations))
}

fn clean_portfolio(portfolio: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    portfolio
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(normalize_ticker)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn known_sectors(config: &RecommenderConfig, tickers: &[String]) -> HashSet<String> {
    tickers
        .iter()
        .filter_map(|t| config.sector_of(t))
        .map(str::to_string)
        .collect()
}

/// Steps 5 through 9: align, correlate, rank, diversify, narrate. Returns
/// None whenever the data does not support a trustworthy answer, which the
/// caller treats as a signal to fall back.
fn correlation_recommendations(
    config: &RecommenderConfig,
    series: &[(String, Vec<PriceBar>)],
    portfolio: &[String],
    portfolio_sectors: &HashSet<String>,
    max_recommendations: usize,
) -> Option<Vec<Recommendation>> {
    let aligned = align_series(series);
    if aligned.observations <= MIN_ALIGNED_OBSERVATIONS || aligned.closes.len() < 2 {
        return None;
    }

    // Best correlation per non-portfolio candidate: top 2 per holding, then
    // deduplicated keeping the strongest link.
    let mut best: HashMap<String, f64> = HashMap::new();

    for holding in portfolio {
        let Some(holding_closes) = aligned.closes.get(holding) else { continue };

        let mut ranked: Vec<(String, f64)> = aligned
            .closes
            .iter()
            .filter(|(ticker, _)| !portfolio.contains(ticker))
            .filter_map(|(ticker, closes)| {
                pearson(holding_closes, closes).map(|c| (ticker.clone(), c))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (ticker, correlation) in ranked.into_iter().take(2) {
            best.entry(ticker)
                .and_modify(|c| *c = c.max(correlation))
                .or_insert(correlation);
        }
    }

    if best.is_empty() {
        return None;
    }

    let mut candidates: Vec<(&CandidateStock, f64)> = best
        .iter()
        .filter_map(|(ticker, &correlation)| {
            config
                .candidates
                .iter()
                .find(|c| &c.ticker == ticker)
                .map(|c| (c, correlation))
        })
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let chosen = select_diverse(&candidates, max_recommendations);
    if chosen.is_empty() {
        return None;
    }

    Some(
        chosen
            .into_iter()
            .map(|(candidate, correlation)| {
                let new_sector = !portfolio_sectors.contains(&candidate.sector);
                Recommendation {
                    ticker: candidate.ticker.clone(),
                    sector: candidate.sector.clone(),
                    correlation: Some(round2(correlation)),
                    reason: rationale(candidate, new_sector),
                    relationship: Some(relationship(correlation)),
                }
            })
            .collect(),
    )
}

/// Diversity-first selection: walk candidates in correlation order, taking a
/// candidate only if its sector is not yet represented among picks, until
/// three distinct sectors are held, after which repeats are allowed. Any
/// remaining slots are filled purely by correlation rank.
fn select_diverse<'a>(
    candidates: &[(&'a CandidateStock, f64)],
    max_recommendations: usize,
) -> Vec<(&'a CandidateStock, f64)> {
    let mut chosen: Vec<(&CandidateStock, f64)> = Vec::new();
    let mut chosen_sectors: HashSet<&str> = HashSet::new();

    for &(candidate, correlation) in candidates {
        if chosen.len() >= max_recommendations {
            break;
        }
        if chosen_sectors.contains(candidate.sector.as_str()) && chosen_sectors.len() < 3 {
            continue;
        }
        chosen_sectors.insert(candidate.sector.as_str());
        chosen.push((candidate, correlation));
    }

    for &(candidate, correlation) in candidates {
        if chosen.len() >= max_recommendations {
            break;
        }
        if chosen.iter().any(|(c, _)| c.ticker == candidate.ticker) {
            continue;
        }
        chosen.push((candidate, correlation));
    }

    chosen
}

/// First `max_recommendations` candidates not already held, with canned
/// sector-appropriate rationale. This path must always succeed.
fn static_fallback(
    config: &RecommenderConfig,
    portfolio: Vec<String>,
    portfolio_sectors: &HashSet<String>,
    max_recommendations: usize,
) -> RecommendationSet {
    let recommendations = config
        .candidates
        .iter()
        .filter(|c| !portfolio.contains(&c.ticker))
        .take(max_recommendations)
        .map(|candidate| {
            let new_sector = !portfolio_sectors.contains(&candidate.sector);
            Recommendation {
                ticker: candidate.ticker.clone(),
                sector: candidate.sector.clone(),
                correlation: None,
                reason: rationale(candidate, new_sector),
                relationship: None,
            }
        })
        .collect();

    RecommendationSet {
        portfolio,
        recommendations,
        success: true,
        note: "Based on popular stocks".to_string(),
    }
}

/// Rationale template, first match in a fixed attribute priority order.
fn rationale(candidate: &CandidateStock, new_sector: bool) -> String {
    let StockTraits { blue_chip, dividend, growth, defensive } = candidate.traits;

    if new_sector {
        format!(
            "Adds exposure to the {} sector, which is missing from your portfolio",
            candidate.sector
        )
    } else if blue_chip {
        "Established blue-chip with a long record of stable performance".to_string()
    } else if dividend {
        "Consistent dividend payer that can cushion downturns".to_string()
    } else if growth {
        "Strong growth potential based on recent momentum".to_string()
    } else if defensive {
        "Defensive pick that tends to hold up in weak markets".to_string()
    } else {
        "Widely held large-cap that broadens your portfolio".to_string()
    }
}

fn relationship(correlation: f64) -> String {
    if correlation > SIMILARITY_THRESHOLD {
        "Moves in a similar pattern to your current holdings".to_string()
    } else {
        "Adds a usefully different return pattern to your portfolio".to_string()
    }
}

struct AlignedSeries {
    /// Closes per ticker over the common date index, same length everywhere.
    closes: HashMap<String, Vec<f64>>,
    observations: usize,
}

/// Inner-join all series on their common trading dates.
fn align_series(series: &[(String, Vec<PriceBar>)]) -> AlignedSeries {
    let mut common: Option<BTreeSet<chrono::NaiveDate>> = None;

    for (_, bars) in series {
        let dates: BTreeSet<chrono::NaiveDate> = bars.iter().map(|b| b.date).collect();
        common = Some(match common {
            Some(acc) => acc.intersection(&dates).copied().collect(),
            None => dates,
        });
    }

    let common = common.unwrap_or_default();

    let closes = series
        .iter()
        .map(|(ticker, bars)| {
            let by_date: HashMap<_, _> = bars.iter().map(|b| (b.date, b.close)).collect();
            let aligned: Vec<f64> = common.iter().filter_map(|d| by_date.get(d).copied()).collect();
            (ticker.clone(), aligned)
        })
        .collect();

    AlignedSeries {
        closes,
        observations: common.len(),
    }
}

/// Pearson correlation over two equally-long series. None when either side
/// has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let std_x = var_x.sqrt();
    let std_y = var_y.sqrt();

    if std_x < f64::EPSILON || std_y < f64::EPSILON {
        return None;
    }

    Some(cov / (std_x * std_y))
}
