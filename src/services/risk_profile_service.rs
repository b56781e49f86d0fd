use crate::models::{
    Experience, InvestmentGoal, ProfileName, RiskAnswers, RiskProfile, RiskTolerance, Timeline,
};

/// Score a questionnaire into a named risk profile. Unanswered questions
/// contribute nothing; an entirely empty questionnaire yields the balanced
/// default profile with a nudge to take the quiz.
pub fn assess_risk_profile(answers: &RiskAnswers) -> RiskProfile {
    if answers.is_empty() {
        return RiskProfile {
            risk_profile: ProfileName::Moderate,
            risk_score: 5,
            max_risk_allocation: 50,
            suggestion: "Answer the risk quiz to get a profile tailored to you.".to_string(),
            success: true,
        };
    }

    let score = risk_score(answers);
    let profile = profile_for(score);

    RiskProfile {
        risk_profile: profile,
        risk_score: score,
        max_risk_allocation: profile.max_risk_allocation(),
        suggestion: suggestion_for(profile),
        success: true,
    }
}

/// Additive scoring from a neutral baseline of 5, clamped into 1..=10.
fn risk_score(answers: &RiskAnswers) -> u8 {
    let mut score: i32 = 5;

    if let Some(age) = answers.age {
        score += match age {
            a if a < 30 => 2,
            a if a < 40 => 1,
            a if a < 50 => 0,
            a if a < 60 => -1,
            _ => -2,
        };
    }

    if let Some(timeline) = answers.timeline {
        score += match timeline {
            Timeline::Long => 2,
            Timeline::Medium => 0,
            Timeline::Short => -2,
        };
    }

    if let Some(experience) = answers.experience {
        score += match experience {
            Experience::Experienced => 2,
            Experience::Some => 1,
            Experience::Beginner => 0,
            Experience::None => -1,
        };
    }

    if let Some(tolerance) = answers.risk_tolerance {
        score += match tolerance {
            RiskTolerance::High => 2,
            RiskTolerance::Medium => 0,
            RiskTolerance::Low => -2,
        };
    }

    if let Some(goal) = answers.goal {
        score += match goal {
            InvestmentGoal::Growth => 1,
            InvestmentGoal::Balanced => 0,
            InvestmentGoal::Income => -1,
        };
    }

    score.clamp(1, 10) as u8
}

fn profile_for(score: u8) -> ProfileName {
    match score {
        s if s >= 8 => ProfileName::Aggressive,
        s if s >= 6 => ProfileName::Growth,
        s if s >= 4 => ProfileName::Moderate,
        s if s >= 2 => ProfileName::Conservative,
        _ => ProfileName::VeryConservative,
    }
}

fn suggestion_for(profile: ProfileName) -> String {
    match profile {
        ProfileName::VeryConservative => {
            "Favour capital preservation: large-cap dividend payers and debt funds."
        }
        ProfileName::Conservative => {
            "Keep most of your portfolio in stable large-caps with a small growth sleeve."
        }
        ProfileName::Moderate => {
            "A balanced mix of established large-caps and selective growth stocks suits you."
        }
        ProfileName::Growth => {
            "You can tilt toward growth stocks while keeping a stable core."
        }
        ProfileName::Aggressive => {
            "You can afford a growth-heavy portfolio, but keep some defensive ballast."
        }
    }
    .to_string()
}
