//! Core types for questionnaire evaluation.

use serde::{Deserialize, Serialize};

/// Letter answer on the ESG completion scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EsgAnswer {
    A,
    B,
    C,
    D,
    E,
}

impl EsgAnswer {
    /// Parse a letter case-insensitively. Anything unrecognised scores as `A`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "B" => Self::B,
            "C" => Self::C,
            "D" => Self::D,
            "E" => Self::E,
            _ => Self::A,
        }
    }

    /// Fraction of the question's points earned by this answer.
    pub fn percentage(&self) -> f64 {
        match self {
            Self::A => 0.0,
            Self::B => 0.25,
            Self::C => 0.5,
            Self::D => 0.75,
            Self::E => 1.0,
        }
    }

    pub fn is_lowest(&self) -> bool {
        *self == Self::A
    }
}

impl std::fmt::Display for EsgAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        };
        write!(f, "{}", letter)
    }
}

/// A validated ESG question.
#[derive(Debug, Clone, PartialEq)]
pub struct EsgQuestion {
    pub id: String,
    pub text: String,
    pub max_points: f64,
    pub answer: EsgAnswer,
    pub evidence: Option<String>,
}

/// A validated weighted question. `weight` is always within [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedQuestion {
    pub id: String,
    pub max_score: f64,
    pub weight: f64,
    pub answer: String,
}

/// Per-question contribution to an ESG score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgQuestionScore {
    pub id: String,
    pub text: String,
    pub answer: EsgAnswer,
    pub max_points: f64,
    pub earned_points: f64,
    pub percentage: f64,
    /// Evidence reads as contradicting a non-minimal answer. Informational only.
    pub contradiction_risk: bool,
}

/// Aggregated ESG scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgBreakdown {
    pub questions: Vec<EsgQuestionScore>,
    pub total_earned: f64,
    pub total_max: f64,
    /// Percentage score rounded to two decimals.
    pub final_score: f64,
    /// Ids of questions answered at 75% or better.
    pub strengths: Vec<String>,
    /// Ids of questions answered below 50%.
    pub risks: Vec<String>,
}

impl EsgBreakdown {
    pub fn flagged(&self) -> impl Iterator<Item = &EsgQuestionScore> {
        self.questions.iter().filter(|q| q.contradiction_risk)
    }
}

/// Per-question contribution to a weighted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedQuestionScore {
    pub id: String,
    pub max_score: f64,
    pub weight: f64,
    pub question_score: f64,
}

/// Aggregated weighted scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedBreakdown {
    pub questions: Vec<WeightedQuestionScore>,
    pub total_weighted: f64,
    pub total_max_possible: f64,
    pub percentage: f64,
    pub final_score: u8,
}

/// How a deterministic score was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ScoreDetails {
    Esg(EsgBreakdown),
    Weighted(WeightedBreakdown),
}

impl ScoreDetails {
    pub fn final_score(&self) -> f64 {
        match self {
            Self::Esg(b) => b.final_score,
            Self::Weighted(b) => f64::from(b.final_score),
        }
    }
}

/// The engine's sole output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub analysis: String,
    /// Within [0, 100]. Fractional only on the ESG path.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_details: Option<ScoreDetails>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
