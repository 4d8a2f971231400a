use super::anchoring::{anchor_corrections, proposed_corrections};
use super::domain::{
    twenty_point_grade, EvaluationResult, RubricFeedback, RubricScores, NO_DETAILED_EVALUATION,
};
use super::parser::{parse_payload, string_list, text_field};
use super::rubric::{repair_feedback, repair_scores, resolve_grade};
use tracing::{debug, warn};

/// Turns raw model output into a fully populated evaluation.
///
/// Never fails: unparseable output becomes [`EvaluationResult::parse_fallback`],
/// and missing or malformed fields are replaced by their defaults.
pub fn normalize_response(raw_response: &str, essay: &str) -> EvaluationResult {
    let payload = match parse_payload(raw_response) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "model response is not a JSON object; using fallback evaluation");
            return EvaluationResult::parse_fallback(raw_response);
        }
    };

    let corrections = anchor_corrections(essay, proposed_corrections(payload.get("corrections")));

    let (rubric_scores, rubric_feedback, total, grade) =
        match repair_scores(payload.get("rubric_scores")) {
            Some(scores) => {
                let total = scores.total();
                (
                    scores,
                    repair_feedback(payload.get("rubric_feedback")),
                    total,
                    text_field(&payload, "grade").map(str::to_string),
                )
            }
            None => {
                warn!("rubric_scores missing or invalid; using default rubric");
                let scores = RubricScores::default();
                let total = scores.total();
                (
                    scores,
                    RubricFeedback::uniform(NO_DETAILED_EVALUATION),
                    total,
                    Some(twenty_point_grade(total)),
                )
            }
        };

    let (total_score, grade) = resolve_grade(grade.as_deref(), total);

    let feedback = text_field(&payload, "feedback")
        .unwrap_or(raw_response)
        .to_string();

    debug!(
        total_score,
        corrections = corrections.len(),
        "normalized model response"
    );

    EvaluationResult {
        feedback,
        corrections,
        rubric_scores,
        rubric_feedback,
        total_score,
        grade,
        strengths: string_list(payload.get("strengths")),
        improvements: string_list(payload.get("improvements")),
    }
}
