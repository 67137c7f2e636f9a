//! Input classification.
//!
//! Raw questionnaire text is either a JSON document or plain prose. JSON
//! documents are further sorted into the letter-graded ESG shape, the
//! weighted-question shape, or anything else. Questions are validated here,
//! once, and malformed ones are dropped rather than failing the input.

use log::debug;
use serde_json::{Map, Value};

use crate::evaluation::types::{EsgAnswer, EsgQuestion, WeightedQuestion};
use crate::utils::{lenient_number, value_text};

/// `maxScore` used when a weighted question omits it.
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

/// Questionnaire after the structured/plain-text decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInput {
    PlainText { text: String },
    Structured { value: Value },
}

/// Shape of a structured questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape {
    /// Every question carries an `answer` letter. Holds the questions that
    /// survived validation (possibly none).
    Esg(Vec<EsgQuestion>),
    /// A non-empty `questions` list that is not ESG. Holds the questions with
    /// a usable weight (possibly none).
    Weighted(Vec<WeightedQuestion>),
    Generic,
}

impl InputShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Esg(_) => "esg",
            Self::Weighted(_) => "weighted",
            Self::Generic => "generic",
        }
    }
}

/// Decide between structured and plain-text input. Never fails: anything
/// that is not JSON is plain text.
pub fn classify(raw: &str) -> ParsedInput {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => ParsedInput::Structured { value },
        Err(err) => {
            debug!("Treating input as plain text: {}", err);
            ParsedInput::PlainText {
                text: raw.to_string(),
            }
        }
    }
}

/// Determine the shape of structured input. ESG takes priority.
pub fn detect_shape(value: &Value) -> InputShape {
    let Some(questions) = value
        .get("questions")
        .and_then(Value::as_array)
        .filter(|q| !q.is_empty())
    else {
        return InputShape::Generic;
    };

    let all_answered = questions
        .iter()
        .all(|q| q.as_object().is_some_and(|obj| obj.contains_key("answer")));

    if all_answered {
        let parsed = questions
            .iter()
            .enumerate()
            .filter_map(|(idx, q)| parse_esg_question(idx, q))
            .collect();
        InputShape::Esg(parsed)
    } else {
        let parsed = questions
            .iter()
            .enumerate()
            .filter_map(|(idx, q)| parse_weighted_question(idx, q))
            .collect();
        InputShape::Weighted(parsed)
    }
}

fn first_of<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key))
}

fn question_id(idx: usize, obj: &Map<String, Value>) -> String {
    match obj.get("id") {
        Some(Value::Null) | None => format!("q{}", idx + 1),
        Some(id) => value_text(id),
    }
}

fn parse_esg_question(idx: usize, raw: &Value) -> Option<EsgQuestion> {
    let obj = raw.as_object()?;

    let max_points = first_of(obj, &["maxPoints", "max_points", "points"])
        .and_then(lenient_number)
        .filter(|points| *points >= 0.0);
    let Some(max_points) = max_points else {
        debug!("Skipping ESG question {}: unusable maxPoints", idx + 1);
        return None;
    };

    let answer = obj
        .get("answer")
        .and_then(Value::as_str)
        .map(EsgAnswer::parse_lenient)
        .unwrap_or(EsgAnswer::A);

    Some(EsgQuestion {
        id: question_id(idx, obj),
        text: first_of(obj, &["text", "question"])
            .map(value_text)
            .unwrap_or_default(),
        max_points,
        answer,
        evidence: obj
            .get("evidence")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn parse_weighted_question(idx: usize, raw: &Value) -> Option<WeightedQuestion> {
    let obj = raw.as_object()?;

    let Some(weight) = obj.get("weight").and_then(normalize_weight) else {
        debug!("Skipping weighted question {}: unusable weight", idx + 1);
        return None;
    };

    let max_score = first_of(obj, &["max_score", "maxScore"])
        .and_then(lenient_number)
        .unwrap_or(DEFAULT_MAX_SCORE);
    if max_score < 0.0 {
        debug!("Skipping weighted question {}: negative max_score", idx + 1);
        return None;
    }

    Some(WeightedQuestion {
        id: question_id(idx, obj),
        max_score,
        weight,
        answer: obj.get("answer").map(value_text).unwrap_or_default(),
    })
}

/// Normalize a raw weight to a fraction in [0, 1].
///
/// `"75%"` is a percentage; a bare number above 1 is a percentage magnitude;
/// anything else is already a fraction.
pub fn normalize_weight(raw: &Value) -> Option<f64> {
    let fraction = match raw {
        Value::String(s) if s.contains('%') => {
            let number: f64 = s.replace('%', "").trim().parse().ok()?;
            number / 100.0
        }
        other => {
            let number = lenient_number(other)?;
            if number > 1.0 {
                number / 100.0
            } else {
                number
            }
        }
    };

    fraction.is_finite().then(|| fraction.clamp(0.0, 1.0))
}
