//! Integration tests for the evaluation engine's public API.
//!
//! The text-generation collaborator is replaced by local mocks; nothing here
//! touches the network or spawns a provider CLI.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use raimes::evaluation::llm::extract_analysis;
use raimes::evaluation::{
    classify, format_report, EvaluationEngine, EvaluationReport, OutputFormat, ParsedInput,
    ScoreDetails,
};
use raimes::llm::{LlmClient, LlmConfig, LlmError, LlmProvider};
use raimes::supporting_file::SupportingFile;
use serde_json::json;

struct CannedClient(&'static str);

impl LlmClient for CannedClient {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
struct DownClient {
    calls: AtomicUsize,
}

impl LlmClient for DownClient {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::Unavailable("network unreachable".to_string()))
    }
}

fn esg_input(answers: &[(&str, f64)]) -> String {
    let questions: Vec<_> = answers
        .iter()
        .enumerate()
        .map(|(i, (answer, points))| json!({"id": format!("Q{}", i + 1), "maxPoints": points, "answer": answer}))
        .collect();
    json!({ "questions": questions }).to_string()
}

#[test]
fn esg_questionnaire_scores_deterministically() {
    let client = Arc::new(DownClient::default());
    let engine = EvaluationEngine::new(client.clone());

    let result = engine.evaluate(&esg_input(&[("D", 20.0), ("A", 10.0)]), None);

    assert_eq!(result.score, 50.0);
    let Some(ScoreDetails::Esg(breakdown)) = &result.score_details else {
        panic!("expected ESG details");
    };
    assert_eq!(breakdown.total_earned, 15.0);
    assert_eq!(breakdown.total_max, 30.0);
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn esg_extremes() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));

    let all_e = engine.evaluate(&esg_input(&[("E", 5.0), ("e", 15.0)]), None);
    assert_eq!(all_e.score, 100.0);

    let all_a = engine.evaluate(&esg_input(&[("A", 5.0), ("A", 15.0)]), None);
    assert_eq!(all_a.score, 0.0);

    let mixed = engine.evaluate(&esg_input(&[("E", 5.0), ("B", 15.0)]), None);
    assert!(mixed.score > 0.0 && mixed.score < 100.0);
}

#[test]
fn huge_point_values_keep_scores_in_range() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));

    let esg = engine.evaluate(&esg_input(&[("E", 1e308), ("E", 1e308)]), None);
    assert_eq!(esg.score, 100.0);
    assert!(!esg.analysis.contains("NaN"));

    let weighted = json!({"questions": [
        {"max_score": 1e308, "weight": 1},
        {"max_score": 1e308, "weight": 1}
    ]})
    .to_string();
    let weighted = engine.evaluate(&weighted, None);
    assert_eq!(weighted.score, 100.0);
}

#[test]
fn unknown_letters_score_like_a() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));

    let unknown = engine.evaluate(&esg_input(&[("Z", 10.0), ("E", 10.0)]), None);
    let lowest = engine.evaluate(&esg_input(&[("A", 10.0), ("E", 10.0)]), None);

    assert_eq!(unknown.score, lowest.score);
}

#[test]
fn evidence_never_changes_the_score() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));
    let plain = json!({"questions": [{"maxPoints": 10, "answer": "D"}]}).to_string();
    let contradicted = json!({"questions": [
        {"maxPoints": 10, "answer": "D", "evidence": "No evidence of a closure plan"}
    ]})
    .to_string();

    let plain = engine.evaluate(&plain, None);
    let contradicted = engine.evaluate(&contradicted, None);

    assert_eq!(plain.score, contradicted.score);
    let (Some(ScoreDetails::Esg(a)), Some(ScoreDetails::Esg(b))) =
        (&plain.score_details, &contradicted.score_details)
    else {
        panic!("expected ESG details");
    };
    assert_eq!(a.questions[0].earned_points, b.questions[0].earned_points);
    assert!(!a.questions[0].contradiction_risk);
    assert!(b.questions[0].contradiction_risk);
}

#[test]
fn weighted_questionnaire_floors_percentage() {
    let engine = EvaluationEngine::new(Arc::new(CannedClient("The operation is sound.")));
    let raw = json!({"questions": [
        {"max_score": 100, "weight": "75%"},
        {"max_score": 50, "weight": 0.2}
    ]})
    .to_string();

    let result = engine.evaluate(&raw, None);

    assert_eq!(result.score, 56.0);
    assert_eq!(result.score.fract(), 0.0);
    assert!(result.analysis.starts_with("The operation is sound."));
}

#[test]
fn negative_max_score_does_not_distort_weighted_score() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));
    let raw = json!({"questions": [
        {"max_score": -50, "weight": 1},
        {"max_score": 100, "weight": 0.5}
    ]})
    .to_string();

    let result = engine.evaluate(&raw, None);

    assert_eq!(result.score, 50.0);
}

#[test]
fn plain_text_falls_back_when_collaborator_is_down() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));

    let result = engine.evaluate("hello", None);

    assert!((60.0..=95.0).contains(&result.score));
    assert!(result.analysis.contains("fallback system"));
    assert!(!result.recommendations.is_empty());
}

#[test]
fn offline_provider_routes_to_fallback() {
    let client = LlmConfig::new()
        .with_provider(LlmProvider::Offline)
        .create_client();
    let engine = EvaluationEngine::new(client);

    let result = engine.evaluate(r#"{"environment": {"dust": "low"}}"#, None);

    assert!(result.analysis.contains("fallback system"));
    assert!((60.0..=95.0).contains(&result.score));
}

#[test]
fn fallback_score_stays_bounded_for_large_inputs() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));
    let mut big = serde_json::Map::new();
    for i in 0..500 {
        big.insert(format!("safety_metric_{}", i), json!("excellent"));
    }
    let mut bleak = serde_json::Map::new();
    for i in 0..500 {
        bleak.insert(format!("item_{}", i), json!("poor"));
    }

    let high = engine.evaluate(&serde_json::Value::Object(big).to_string(), None);
    let low = engine.evaluate(&serde_json::Value::Object(bleak).to_string(), None);

    assert_eq!(high.score, 95.0);
    assert_eq!(low.score, 60.0);
}

#[test]
fn embedded_object_is_extracted_from_prose() {
    let extracted = extract_analysis(r#"noise noise {"analysis":"ok","score":80} trailing"#);
    assert_eq!(extracted.analysis, "ok");
    assert_eq!(extracted.score, 80.0);
}

#[test]
fn extraction_always_yields_a_record() {
    for response in ["", "plain prose", r#"{"analysis": "trunc"#, "```json\n{]\n```", "{}"] {
        let extracted = extract_analysis(response);
        assert!((0.0..=100.0).contains(&extracted.score), "{:?}", response);
    }
}

#[test]
fn classify_accepts_any_string() {
    for raw in ["", "   ", "{", "[1,", "null", "\"quoted\"", "not json at all"] {
        let _ = classify(raw);
    }
    assert!(matches!(classify("null"), ParsedInput::Structured { .. }));
}

#[test]
fn binary_supporting_file_is_summarised_not_embedded() {
    struct Recorder(std::sync::Mutex<String>);
    impl LlmClient for Recorder {
        fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            *self.0.lock().unwrap() = prompt.to_string();
            Ok(r#"{"analysis": "fine", "score": 70}"#.to_string())
        }
    }

    let client = Arc::new(Recorder(std::sync::Mutex::new(String::new())));
    let engine = EvaluationEngine::new(client.clone());
    let file = SupportingFile::new("site-map.png", vec![0x89, b'P', b'N', b'G', b'S', b'E', b'C', b'R']);

    engine.evaluate("open pit", Some(&file));

    let prompt = client.0.lock().unwrap().clone();
    assert!(prompt.contains("File: site-map.png\nSize: 8 bytes"));
    assert!(!prompt.contains("PNGSECR"));
}

#[test]
fn engine_is_shared_across_threads() {
    let engine = Arc::new(EvaluationEngine::new(Arc::new(CannedClient(
        r#"{"analysis": "ok", "score": 81}"#,
    ))));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                if i % 2 == 0 {
                    engine.evaluate(&esg_input(&[("C", 10.0)]), None).score
                } else {
                    engine.evaluate("generic text", None).score
                }
            })
        })
        .collect();

    let scores: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(scores, vec![50.0, 81.0, 50.0, 81.0]);
}

#[test]
fn report_renders_as_json() {
    let engine = EvaluationEngine::new(Arc::new(DownClient::default()));
    let report = EvaluationReport::new(engine.evaluate(&esg_input(&[("E", 10.0)]), None));

    let output = format_report(&report, OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["score"], 100.0);
    assert_eq!(value["score_details"]["method"], "esg");
    assert!(value["evaluated_at"].is_string());
    assert!(value["analysis"].is_string());
}
