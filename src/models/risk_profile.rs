use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeline {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    None,
    Beginner,
    Some,
    Experienced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentGoal {
    Income,
    Balanced,
    Growth,
}

/// Questionnaire answers. Every field is optional; unanswered questions
/// simply leave the score at its neutral midpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnswers {
    pub age: Option<u32>,
    pub timeline: Option<Timeline>,
    pub experience: Option<Experience>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub goal: Option<InvestmentGoal>,
}

impl RiskAnswers {
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.timeline.is_none()
            && self.experience.is_none()
            && self.risk_tolerance.is_none()
            && self.goal.is_none()
    }
}

/// Five named profiles, each with a fixed ceiling on the share of a
/// portfolio allocated to higher-risk holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileName {
    VeryConservative,
    Conservative,
    Moderate,
    Growth,
    Aggressive,
}

impl ProfileName {
    pub fn max_risk_allocation(self) -> u8 {
        match self {
            ProfileName::VeryConservative => 20,
            ProfileName::Conservative => 30,
            ProfileName::Moderate => 50,
            ProfileName::Growth => 70,
            ProfileName::Aggressive => 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub risk_profile: ProfileName,
    /// Bounded to [1, 10].
    pub risk_score: u8,
    pub max_risk_allocation: u8,
    pub suggestion: String,
    pub success: bool,
}
