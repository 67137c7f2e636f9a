//! Heuristic fallback scoring.
//!
//! Used when no deterministic score applies and the text-generation
//! collaborator is unavailable. The score only reflects how complete and
//! upbeat the submitted data looks, so it is clamped to [60, 95]: an
//! approximation should never report outright failure or perfection.

use serde_json::Value;

use crate::evaluation::input::ParsedInput;
use crate::utils::value_text;

pub const BASE_SCORE: i32 = 70;
pub const MIN_SCORE: u8 = 60;
pub const MAX_SCORE: u8 = 95;

const TOPIC_KEYWORDS: &[&str] = &[
    "safety",
    "environment",
    "operational",
    "management",
    "compliance",
    "financial",
];
const TOPIC_BONUS: i32 = 3;

const LEAF_BONUS: i32 = 2;
const MAX_COMPLETENESS_BONUS: i32 = 20;

const POSITIVE_KEYWORDS: &[&str] = &["excellent", "good", "high", "advanced", "comprehensive"];
const NEGATIVE_KEYWORDS: &[&str] = &["poor", "low", "inadequate", "minimal"];

const MAX_RECOMMENDATIONS: usize = 4;

/// Key used for the whole body of plain-text input.
pub const RAW_TEXT_KEY: &str = "raw_text";

/// A bounded approximate score with its narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackAssessment {
    pub score: u8,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

/// Flatten a JSON tree into `(key, leaf)` pairs. Nested object keys are
/// joined with `_`. Arrays are not descended into: each is a single leaf.
/// Empty objects contribute nothing.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut leaves = Vec::new();
    flatten_into(value, String::new(), &mut leaves);
    leaves
}

fn flatten_into(value: &Value, prefix: String, leaves: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}_{}", prefix, key)
                };
                flatten_into(child, key, leaves);
            }
        }
        leaf => {
            let key = if prefix.is_empty() {
                "value".to_string()
            } else {
                prefix
            };
            leaves.push((key, leaf.clone()));
        }
    }
}

fn leaves_of(input: &ParsedInput) -> Vec<(String, Value)> {
    match input {
        ParsedInput::PlainText { text } => {
            vec![(RAW_TEXT_KEY.to_string(), Value::String(text.clone()))]
        }
        ParsedInput::Structured { value } => flatten(value),
    }
}

fn coverage_bonus(leaves: &[(String, Value)]) -> i32 {
    let haystacks: Vec<(String, String)> = leaves
        .iter()
        .map(|(key, value)| (key.to_lowercase(), value_text(value).to_lowercase()))
        .collect();

    let covered = TOPIC_KEYWORDS
        .iter()
        .filter(|topic| {
            haystacks
                .iter()
                .any(|(key, value)| key.contains(*topic) || value.contains(*topic))
        })
        .count() as i32;

    covered * TOPIC_BONUS
}

fn quality_bonus(leaves: &[(String, Value)]) -> i32 {
    leaves
        .iter()
        .map(|(_, value)| match value {
            Value::Number(n) if n.as_f64().is_some_and(|v| v > 0.0) => 1,
            // true counts as the number 1
            Value::Bool(true) => 1,
            Value::String(s) => {
                let lowered = s.to_lowercase();
                if POSITIVE_KEYWORDS.iter().any(|w| lowered.contains(w)) {
                    2
                } else if NEGATIVE_KEYWORDS.iter().any(|w| lowered.contains(w)) {
                    -1
                } else {
                    0
                }
            }
            _ => 0,
        })
        .sum()
}

/// Compute the bounded heuristic score for any input.
pub fn fallback_score(input: &ParsedInput) -> u8 {
    let leaves = leaves_of(input);
    score_leaves(&leaves)
}

fn score_leaves(leaves: &[(String, Value)]) -> u8 {
    let completeness = (leaves.len() as i32)
        .saturating_mul(LEAF_BONUS)
        .min(MAX_COMPLETENESS_BONUS);
    let total = BASE_SCORE
        .saturating_add(coverage_bonus(leaves))
        .saturating_add(completeness)
        .saturating_add(quality_bonus(leaves));

    total.clamp(i32::from(MIN_SCORE), i32::from(MAX_SCORE)) as u8
}

fn performance_band(score: u8) -> &'static str {
    match score {
        85..=u8::MAX => "demonstrates excellent performance",
        75..=84 => "shows good performance with room for improvement",
        65..=74 => "indicates satisfactory performance requiring attention",
        _ => "needs improvement across several areas",
    }
}

fn any_key(keys: &[String], needles: &[&str]) -> bool {
    keys.iter()
        .any(|key| needles.iter().any(|needle| key.contains(needle)))
}

fn recommendations(leaves: &[(String, Value)]) -> Vec<String> {
    let keys: Vec<String> = leaves.iter().map(|(k, _)| k.to_lowercase()).collect();

    let mut recs = Vec::new();
    if any_key(&keys, &["safety"]) {
        recs.push("Enhance safety protocols and monitoring systems".to_string());
    }
    if any_key(&keys, &["environment"]) {
        recs.push("Strengthen environmental impact mitigation strategies".to_string());
    }
    if any_key(&keys, &["operational", "efficiency"]) {
        recs.push("Optimize operational efficiency and resource utilization".to_string());
    }
    if any_key(&keys, &["management", "workforce"]) {
        recs.push("Develop comprehensive workforce management programs".to_string());
    }

    if recs.is_empty() {
        recs = vec![
            "Implement comprehensive monitoring systems".to_string(),
            "Enhance regulatory compliance procedures".to_string(),
            "Develop continuous improvement strategies".to_string(),
        ];
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

/// Full fallback assessment: score, narrative and recommendations.
pub fn fallback_assessment(input: &ParsedInput, file_name: Option<&str>) -> FallbackAssessment {
    let leaves = leaves_of(input);
    let score = score_leaves(&leaves);
    let file_note = file_name
        .map(|name| format!(" and supporting file '{}'", name))
        .unwrap_or_default();

    let analysis = format!(
        "Based on the mining evaluation questionnaire with {} data points{}, the system {}.\n\n\
         TECHNICAL ASSESSMENT:\n\
         The evaluation covers multiple operational areas. Data completeness suggests a structured approach to mining operations management.\n\n\
         COMPLIANCE & MANAGEMENT:\n\
         The provided information indicates awareness of regulatory and operational requirements. Management systems appear to be documented.\n\n\
         RECOMMENDATIONS FOCUS:\n\
         Key areas for enhancement include safety protocol optimization, environmental impact monitoring, and operational efficiency improvements.\n\n\
         Note: This analysis was generated by the fallback system because the AI analysis service was unavailable. For a detailed AI-powered analysis, please try again later.",
        leaves.len(),
        file_note,
        performance_band(score)
    );

    FallbackAssessment {
        score,
        analysis,
        recommendations: recommendations(&leaves),
    }
}
