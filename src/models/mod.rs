mod forecast;
mod metrics;
mod price_bar;
mod recommendation;
mod risk_profile;

pub use forecast::{ForecastMethod, ForecastResult, ForecastSummary, PredictionPoint, Trend};
pub use metrics::{
    ChartData, ComparisonInsights, ComparisonResponse, Fundamentals, MetricsBundle,
    ReturnsMetrics, RiskLevel, RiskMeter, RiskMetrics, StabilityMetrics,
};
pub use price_bar::{IssuerMetadata, PriceBar};
pub use recommendation::{Recommendation, RecommendationSet, RecommendRequest};
pub use risk_profile::{
    Experience, InvestmentGoal, ProfileName, RiskAnswers, RiskProfile, RiskTolerance, Timeline,
};
