//! Salvaging an analysis from free-form model output.
//!
//! Model output is untrusted. Extraction never fails; it walks down a ladder
//! of increasingly lenient readings and ends with a synthetic record.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::utils::{extract_fenced_block, lenient_number, prefix_chars, truncate_chars};

/// Score given when the response carries no usable JSON.
pub const UNSTRUCTURED_SCORE: f64 = 75.0;
/// Score given when JSON was found but could not be parsed.
pub const MALFORMED_SCORE: f64 = 70.0;

const UNSTRUCTURED_MAX_CHARS: usize = 500;
const MALFORMED_MAX_CHARS: usize = 300;
const MALFORMED_PREFIX: &str =
    "Analysis completed but the response format was not standard. ";

static ANALYSIS_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{[^{}]*"analysis"[^{}]*"score"[^{}]*\}"#).unwrap()
});

/// Analysis recovered from a model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAnalysis {
    pub analysis: String,
    /// Within [0, 100].
    pub score: f64,
    pub recommendations: Vec<String>,
}

impl ExtractedAnalysis {
    fn unstructured(text: &str) -> Self {
        Self {
            analysis: truncate_chars(text, UNSTRUCTURED_MAX_CHARS, "..."),
            score: UNSTRUCTURED_SCORE,
            recommendations: Vec::new(),
        }
    }

    fn malformed(text: &str) -> Self {
        Self {
            analysis: format!("{}{}", MALFORMED_PREFIX, prefix_chars(text, MALFORMED_MAX_CHARS)),
            score: MALFORMED_SCORE,
            recommendations: Vec::new(),
        }
    }

    /// Read an already-parsed JSON object, coercing field types.
    fn from_value(value: &Value, raw: &str) -> Option<Self> {
        let obj = value.as_object()?;

        let analysis = match obj.get("analysis") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => truncate_chars(raw, UNSTRUCTURED_MAX_CHARS, "..."),
            Some(other) => other.to_string(),
        };
        let score = obj
            .get("score")
            .and_then(lenient_number)
            .unwrap_or(UNSTRUCTURED_SCORE)
            .clamp(0.0, 100.0);
        let recommendations = obj
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            analysis,
            score,
            recommendations,
        })
    }
}

/// Parse a JSON candidate into an analysis. None means the candidate was
/// not a JSON object.
fn parse_candidate(candidate: &str, raw: &str) -> Option<ExtractedAnalysis> {
    serde_json::from_str::<Value>(candidate)
        .ok()
        .and_then(|value| ExtractedAnalysis::from_value(&value, raw))
}

/// Extract an analysis/score pair from model output.
///
/// 1. Text that is itself a JSON object (bare or in a code fence) is trusted.
/// 2. Otherwise the first `{ ... "analysis" ... "score" ... }` span is parsed.
/// 3. No candidate at all: the text itself becomes the analysis.
/// 4. A candidate that fails to parse yields an explanatory record.
pub fn extract_analysis(text: &str) -> ExtractedAnalysis {
    let trimmed = text.trim();

    let direct = if trimmed.starts_with('{') {
        Some(trimmed)
    } else {
        extract_fenced_block(trimmed).filter(|block| block.starts_with('{'))
    };

    let mut attempted = false;
    if let Some(candidate) = direct {
        attempted = true;
        match parse_candidate(candidate, trimmed) {
            Some(extracted) => {
                debug!("Parsed model response as a JSON object");
                return extracted;
            }
            None => debug!("Model response looked like JSON but did not parse"),
        }
    }

    if let Some(found) = ANALYSIS_OBJECT.find(trimmed) {
        return match parse_candidate(found.as_str(), trimmed) {
            Some(extracted) => {
                debug!("Recovered embedded analysis object from model response");
                extracted
            }
            None => ExtractedAnalysis::malformed(trimmed),
        };
    }

    if attempted {
        ExtractedAnalysis::malformed(trimmed)
    } else {
        debug!("No JSON in model response; using the text as the analysis");
        ExtractedAnalysis::unstructured(trimmed)
    }
}
