use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub portfolio: Vec<String>,
    #[serde(default)]
    pub max_recommendations: Option<usize>,
}

/// One recommended ticker. `correlation` and `relationship` are present only
/// when the recommendation came out of the correlation analysis; the static
/// fallback carries the sector and rationale alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub ticker: String,
    pub sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// Full recommendation response. `note` is a mandatory provenance string so
/// the caller can tell correlation-derived picks from the popular-stock
/// fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub portfolio: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub success: bool,
    pub note: String,
}
