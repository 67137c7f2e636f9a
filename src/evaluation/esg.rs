//! Letter-graded ESG scoring.
//!
//! Each answer maps to a fixed completion percentage of the question's
//! points. Evidence that reads as contradicting the answer is flagged but
//! never lowers the score: only an `A` answer earns zero.

use log::debug;

use crate::evaluation::types::{EsgBreakdown, EsgQuestion, EsgQuestionScore};

/// Evidence phrases that suggest the claimed practice is not in place.
const CONTRADICTION_PHRASES: &[&str] = &[
    "not implemented",
    "no evidence",
    "absent",
    "not found",
    "not available",
    "not in place",
];

const STRENGTH_THRESHOLD: f64 = 0.75;
const RISK_THRESHOLD: f64 = 0.5;

/// Maximum recommendations produced from an ESG breakdown.
const MAX_RECOMMENDATIONS: usize = 5;

fn contradicts(evidence: &str) -> bool {
    let lowered = evidence.to_lowercase();
    CONTRADICTION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score validated ESG questions. Returns None when there is nothing to score.
pub fn score_esg(questions: &[EsgQuestion]) -> Option<EsgBreakdown> {
    if questions.is_empty() {
        return None;
    }

    let mut scored = Vec::with_capacity(questions.len());
    let mut total_earned: f64 = 0.0;
    let mut total_max: f64 = 0.0;
    let mut strengths = Vec::new();
    let mut risks = Vec::new();

    for question in questions {
        if !(total_max + question.max_points).is_finite() {
            debug!("Skipping ESG question {}: point total overflows", question.id);
            continue;
        }

        let percentage = question.answer.percentage();
        let earned_points = question.max_points * percentage;

        let contradiction_risk = !question.answer.is_lowest()
            && question.evidence.as_deref().is_some_and(contradicts);

        total_earned += earned_points;
        total_max += question.max_points;

        if percentage >= STRENGTH_THRESHOLD {
            strengths.push(question.id.clone());
        } else if percentage < RISK_THRESHOLD {
            risks.push(question.id.clone());
        }

        scored.push(EsgQuestionScore {
            id: question.id.clone(),
            text: question.text.clone(),
            answer: question.answer,
            max_points: question.max_points,
            earned_points,
            percentage,
            contradiction_risk,
        });
    }

    let final_score = if total_max > 0.0 {
        round2(total_earned / total_max * 100.0)
    } else {
        0.0
    };

    Some(EsgBreakdown {
        questions: scored,
        total_earned,
        total_max,
        final_score,
        strengths,
        risks,
    })
}

fn rating_band(score: f64) -> &'static str {
    match score {
        s if s >= 85.0 => "leading",
        s if s >= 70.0 => "strong",
        s if s >= 50.0 => "developing",
        s if s >= 25.0 => "weak",
        _ => "critical",
    }
}

fn describe(question: &EsgQuestionScore) -> String {
    if question.text.is_empty() {
        format!("{} (answer {})", question.id, question.answer)
    } else {
        format!("{}: {} (answer {})", question.id, question.text, question.answer)
    }
}

/// Build the narrative for an ESG breakdown.
pub fn esg_narrative(breakdown: &EsgBreakdown) -> String {
    let by_id = |id: &String| breakdown.questions.iter().find(|q| &q.id == id);

    let mut text = format!(
        "ESG questionnaire score: {:.2}/100 ({} performance). {:.2} of {:.2} points earned across {} question(s).",
        breakdown.final_score,
        rating_band(breakdown.final_score),
        breakdown.total_earned,
        breakdown.total_max,
        breakdown.questions.len()
    );

    if breakdown.strengths.is_empty() {
        text.push_str("\n\nSTRENGTHS:\nNo question reached the 75% completion tier.");
    } else {
        text.push_str("\n\nSTRENGTHS:");
        for question in breakdown.strengths.iter().filter_map(by_id) {
            text.push_str(&format!("\n- {}", describe(question)));
        }
    }

    if breakdown.risks.is_empty() {
        text.push_str("\n\nRISKS:\nNo question fell below the 50% completion tier.");
    } else {
        text.push_str("\n\nRISKS:");
        for question in breakdown.risks.iter().filter_map(by_id) {
            text.push_str(&format!("\n- {}", describe(question)));
        }
    }

    let flagged: Vec<_> = breakdown.flagged().collect();
    if !flagged.is_empty() {
        text.push_str(
            "\n\nEVIDENCE REVIEW:\nSupporting evidence appears to contradict these answers. \
             Scores were not reduced; verify before relying on them:",
        );
        for question in flagged {
            text.push_str(&format!("\n- {}", describe(question)));
        }
    }

    text
}

/// Recommendations for the weakest and contradicted answers.
pub fn esg_recommendations(breakdown: &EsgBreakdown) -> Vec<String> {
    let risk_recs = breakdown.risks.iter().map(|id| {
        format!(
            "Raise practice maturity for question {} to at least the 50% tier",
            id
        )
    });
    let evidence_recs = breakdown.flagged().map(|q| {
        format!(
            "Provide supporting evidence for question {} (answer {})",
            q.id, q.answer
        )
    });

    risk_recs
        .chain(evidence_recs)
        .take(MAX_RECOMMENDATIONS)
        .collect()
}
