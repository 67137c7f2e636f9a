//! Questionnaire evaluation engine.
//!
//! Input is classified once, scored deterministically where a formula
//! applies, and enriched by the text-generation collaborator. When that call
//! fails the heuristic fallback takes its place. Every path ends in a
//! complete [`EvaluationResult`]; there is no error channel.
//!
//! Outer input that cannot be decoded at all does not exist at this layer:
//! any string that is not JSON is valid plain text.

pub mod esg;
pub mod heuristic;
pub mod input;
pub mod llm;
pub mod report;
pub mod types;
pub mod weighted;

pub use input::{classify, detect_shape, InputShape, ParsedInput};
pub use report::{format_report, EvaluationReport, OutputFormat};
pub use types::{
    EsgAnswer, EsgBreakdown, EsgQuestion, EsgQuestionScore, EvaluationResult, ScoreDetails,
    WeightedBreakdown, WeightedQuestion, WeightedQuestionScore,
};

use std::sync::Arc;

use log::{debug, info, warn};

use crate::llm::LlmClient;
use crate::supporting_file::SupportingFile;

use heuristic::fallback_assessment;
use llm::ModelAnalyzer;

/// Evaluates questionnaires. Holds no per-request state, so one engine can
/// serve concurrent evaluations.
pub struct EvaluationEngine {
    analyzer: ModelAnalyzer,
}

impl EvaluationEngine {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            analyzer: ModelAnalyzer::new(client),
        }
    }

    /// Evaluate raw questionnaire text with an optional supporting file.
    pub fn evaluate(&self, raw: &str, file: Option<&SupportingFile>) -> EvaluationResult {
        let parsed = classify(raw);

        let shape = match &parsed {
            ParsedInput::Structured { value } => detect_shape(value),
            ParsedInput::PlainText { .. } => InputShape::Generic,
        };
        debug!("Questionnaire shape: {}", shape.name());

        let weighted = match &shape {
            InputShape::Esg(questions) => {
                if let Some(breakdown) = esg::score_esg(questions) {
                    info!("ESG score: {:.2}", breakdown.final_score);
                    return EvaluationResult {
                        analysis: esg::esg_narrative(&breakdown),
                        score: breakdown.final_score,
                        recommendations: esg::esg_recommendations(&breakdown),
                        score_details: Some(ScoreDetails::Esg(breakdown)),
                    };
                }
                debug!("No scorable ESG questions; continuing without a deterministic score");
                None
            }
            InputShape::Weighted(questions) => {
                let breakdown = weighted::score_weighted(questions);
                match &breakdown {
                    Some(b) => info!("Weighted score: {}", b.final_score),
                    None => debug!("No question carried a usable weight"),
                }
                breakdown
            }
            InputShape::Generic => None,
        };

        let mut result = match self.analyzer.analyze(&parsed, file) {
            Ok(extracted) => EvaluationResult {
                analysis: extracted.analysis,
                score: extracted.score,
                score_details: None,
                recommendations: extracted.recommendations,
            },
            Err(err) => {
                warn!("Model analysis unavailable ({}); using fallback scoring", err);
                let fallback = fallback_assessment(&parsed, file.map(|f| f.name.as_str()));
                EvaluationResult {
                    analysis: fallback.analysis,
                    score: f64::from(fallback.score),
                    score_details: None,
                    recommendations: fallback.recommendations,
                }
            }
        };

        if let Some(breakdown) = weighted {
            result.score = f64::from(breakdown.final_score);
            result.analysis = format!(
                "{}\n\n{}",
                result.analysis.trim_end(),
                weighted::weighted_summary(&breakdown)
            );
            result.score_details = Some(ScoreDetails::Weighted(breakdown));
        }

        result
    }
}
