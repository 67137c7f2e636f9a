//! Shared test utilities for creating questionnaire fixtures.

use serde_json::{json, Value};

/// Create an ESG question object.
pub fn esg_question(id: &str, max_points: f64, answer: &str) -> Value {
    json!({"id": id, "maxPoints": max_points, "answer": answer})
}

/// Create an ESG question object carrying evidence text.
pub fn esg_question_with_evidence(id: &str, max_points: f64, answer: &str, evidence: &str) -> Value {
    json!({"id": id, "maxPoints": max_points, "answer": answer, "evidence": evidence})
}

/// Create a weighted question object. `weight` is passed through untouched
/// so callers can use any accepted spelling.
pub fn weighted_question(id: &str, max_score: f64, weight: Value) -> Value {
    json!({"id": id, "max_score": max_score, "weight": weight})
}

/// Wrap question objects into a serialized questionnaire.
pub fn questionnaire(questions: Vec<Value>) -> String {
    json!({ "questions": questions }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questionnaire_shape() {
        let raw = questionnaire(vec![esg_question("E1", 10.0, "C")]);
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["questions"][0]["answer"], "C");
        assert_eq!(value["questions"][0]["maxPoints"], 10.0);
    }
}
