//! Report formatting for evaluation output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evaluation::types::{EsgBreakdown, EvaluationResult, ScoreDetails, WeightedBreakdown};

/// Output format for evaluation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output.
    #[default]
    Pretty,
    /// JSON output.
    Json,
    /// Markdown report.
    Markdown,
}

/// An evaluation result stamped with the time it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: EvaluationResult,
}

impl EvaluationReport {
    pub fn new(result: EvaluationResult) -> Self {
        Self {
            evaluated_at: Utc::now(),
            result,
        }
    }
}

/// Format a report for output.
pub fn format_report(report: &EvaluationReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => format_pretty(report),
        OutputFormat::Json => format_json(report),
        OutputFormat::Markdown => format_markdown(report),
    }
}

fn method_label(details: Option<&ScoreDetails>) -> &'static str {
    match details {
        Some(ScoreDetails::Esg(_)) => "ESG rubric",
        Some(ScoreDetails::Weighted(_)) => "weighted points",
        None => "narrative assessment",
    }
}

fn format_pretty(report: &EvaluationReport) -> String {
    let result = &report.result;
    let mut output = String::new();

    output.push_str(&format!(
        "Evaluation ({})\n",
        report.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "Score: {:.2}/100 [{}]\n\n",
        result.score,
        method_label(result.score_details.as_ref())
    ));

    match &result.score_details {
        Some(ScoreDetails::Esg(breakdown)) => output.push_str(&esg_table_pretty(breakdown)),
        Some(ScoreDetails::Weighted(breakdown)) => {
            output.push_str(&weighted_table_pretty(breakdown))
        }
        None => {}
    }

    output.push_str(result.analysis.trim_end());
    output.push('\n');

    if !result.recommendations.is_empty() {
        output.push_str("\nRecommendations:\n");
        for rec in &result.recommendations {
            output.push_str(&format!("  - {}\n", rec));
        }
    }

    output
}

fn esg_table_pretty(breakdown: &EsgBreakdown) -> String {
    let mut output = String::from("Questions:\n");
    for q in &breakdown.questions {
        let flag = if q.contradiction_risk { " !" } else { "" };
        output.push_str(&format!(
            "  {:<10} {} {:>6.2}/{:<6.2} ({:.0}%){}\n",
            q.id,
            q.answer,
            q.earned_points,
            q.max_points,
            q.percentage * 100.0,
            flag
        ));
    }
    output.push_str(&format!(
        "  Total: {:.2}/{:.2}\n\n",
        breakdown.total_earned, breakdown.total_max
    ));
    output
}

fn weighted_table_pretty(breakdown: &WeightedBreakdown) -> String {
    let mut output = String::from("Questions:\n");
    for q in &breakdown.questions {
        output.push_str(&format!(
            "  {:<10} {:>6.2} x {:.2} = {:.2}\n",
            q.id, q.max_score, q.weight, q.question_score
        ));
    }
    output.push_str(&format!(
        "  Total: {:.2}/{:.2} ({:.2}%)\n\n",
        breakdown.total_weighted, breakdown.total_max_possible, breakdown.percentage
    ));
    output
}

fn format_json(report: &EvaluationReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("Error: {}", e))
}

fn format_markdown(report: &EvaluationReport) -> String {
    let result = &report.result;
    let mut output = String::new();

    output.push_str(&format!(
        "# Questionnaire Evaluation\n\n**Evaluated**: {}\n**Score**: {:.2}/100\n**Method**: {}\n\n",
        report.evaluated_at.to_rfc3339(),
        result.score,
        method_label(result.score_details.as_ref())
    ));

    match &result.score_details {
        Some(ScoreDetails::Esg(breakdown)) => {
            output.push_str(
                "## Questions\n\n| Question | Answer | Earned | Max | Evidence risk |\n|----------|--------|--------|-----|---------------|\n",
            );
            for q in &breakdown.questions {
                output.push_str(&format!(
                    "| {} | {} | {:.2} | {:.2} | {} |\n",
                    q.id,
                    q.answer,
                    q.earned_points,
                    q.max_points,
                    if q.contradiction_risk { "yes" } else { "" }
                ));
            }
            output.push('\n');
        }
        Some(ScoreDetails::Weighted(breakdown)) => {
            output.push_str(
                "## Questions\n\n| Question | Max | Weight | Points |\n|----------|-----|--------|--------|\n",
            );
            for q in &breakdown.questions {
                output.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:.2} |\n",
                    q.id, q.max_score, q.weight, q.question_score
                ));
            }
            output.push('\n');
        }
        None => {}
    }

    output.push_str("## Analysis\n\n");
    output.push_str(result.analysis.trim_end());
    output.push_str("\n\n");

    if !result.recommendations.is_empty() {
        output.push_str("## Recommendations\n\n");
        for rec in &result.recommendations {
            output.push_str(&format!("- {}\n", rec));
        }
    }

    output
}
