use super::domain::{
    twenty_point_grade, RubricCategory, RubricFeedback, RubricScores, MAX_CATEGORY_SCORE,
    MAX_TOTAL_SCORE, MIN_CATEGORY_SCORE, MIN_TOTAL_SCORE, NO_DETAILED_EVALUATION,
};
use serde_json::Value;

const HUNDRED_POINT_MARKER: &str = "/100";

/// Reads all four category scores, or `None` if any one is missing or unusable.
pub(crate) fn repair_scores(value: Option<&Value>) -> Option<RubricScores> {
    let map = value?.as_object()?;
    let mut scores = RubricScores::default();
    for category in RubricCategory::ALL {
        let score = map.get(category.key()).and_then(numeric_value)?;
        let clamped = score
            .round()
            .clamp(f64::from(MIN_CATEGORY_SCORE), f64::from(MAX_CATEGORY_SCORE)) as u8;
        scores.set(category, clamped);
    }
    Some(scores)
}

pub(crate) fn repair_feedback(value: Option<&Value>) -> RubricFeedback {
    let mut feedback = RubricFeedback::uniform(NO_DETAILED_EVALUATION);
    let Some(map) = value.and_then(Value::as_object) else {
        return feedback;
    };

    for category in RubricCategory::ALL {
        if let Some(text) = map
            .get(category.key())
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
        {
            feedback.set(category, text.to_string());
        }
    }
    feedback
}

/// Converts an `N/100` grade to the 20-point scale.
pub(crate) fn rescale_hundred_point(grade: &str) -> Option<u8> {
    if !grade.contains(HUNDRED_POINT_MARKER) {
        return None;
    }
    let numerator = grade.split('/').next().unwrap_or_default();
    let points = leading_integer(numerator)?;
    let rescaled = (f64::from(points) / 5.0)
        .round()
        .clamp(f64::from(MIN_TOTAL_SCORE), f64::from(MAX_TOTAL_SCORE));
    Some(rescaled as u8)
}

/// Final `(total_score, grade)` pair; a 100-point grade overrides the total.
pub(crate) fn resolve_grade(grade: Option<&str>, total: u8) -> (u8, String) {
    match grade.and_then(rescale_hundred_point) {
        Some(rescaled) => (rescaled, twenty_point_grade(rescaled)),
        None => (total, twenty_point_grade(total)),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Integer digits at the start of `text`; any fraction is truncated.
fn leading_integer(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<u32>().ok()
}
