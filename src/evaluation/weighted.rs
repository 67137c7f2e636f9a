//! Weighted-point scoring.

use log::debug;

use crate::evaluation::types::{WeightedBreakdown, WeightedQuestion, WeightedQuestionScore};

/// Score validated weighted questions.
///
/// The final score is the ratio of weighted points to maximum points,
/// floored to an integer percentage. Returns None when no question has a
/// usable weight.
pub fn score_weighted(questions: &[WeightedQuestion]) -> Option<WeightedBreakdown> {
    if questions.is_empty() {
        return None;
    }

    let mut total_weighted: f64 = 0.0;
    let mut total_max_possible: f64 = 0.0;

    let mut scored = Vec::with_capacity(questions.len());
    for q in questions {
        if !(total_max_possible + q.max_score).is_finite() {
            debug!("Skipping weighted question {}: score total overflows", q.id);
            continue;
        }

        let weight = q.weight.clamp(0.0, 1.0);
        let question_score = q.max_score * weight;
        total_weighted += question_score;
        total_max_possible += q.max_score;
        scored.push(WeightedQuestionScore {
            id: q.id.clone(),
            max_score: q.max_score,
            weight,
            question_score,
        });
    }

    let percentage = if total_max_possible > 0.0 {
        total_weighted / total_max_possible * 100.0
    } else {
        0.0
    };
    let final_score = percentage.floor().clamp(0.0, 100.0) as u8;

    Some(WeightedBreakdown {
        questions: scored,
        total_weighted,
        total_max_possible,
        percentage,
        final_score,
    })
}

/// One-line summary used when a weighted score overrides a narrative.
pub fn weighted_summary(breakdown: &WeightedBreakdown) -> String {
    format!(
        "Weighted questionnaire score: {}/100 ({:.2} of {:.2} weighted points across {} question(s)).",
        breakdown.final_score,
        breakdown.total_weighted,
        breakdown.total_max_possible,
        breakdown.questions.len()
    )
}
