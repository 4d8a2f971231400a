//! Normalization of untrusted model output into a canonical rubric evaluation.

mod anchoring;
pub mod domain;
mod normalizer;
mod parser;
mod rubric;

pub use anchoring::{anchor_corrections, ProposedCorrection, TextAnchor};
pub use domain::{
    Correction, EvaluationResult, RubricCategory, RubricFeedback, RubricScores,
    NO_DETAILED_EVALUATION, PARSE_ERROR_FEEDBACK,
};
pub use normalizer::normalize_response;
