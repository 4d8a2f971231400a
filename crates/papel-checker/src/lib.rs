//! Rubric-based evaluation of Filipino concept papers (Konseptong Papel).
//!
//! Essays are graded by a chat-completion model; [`evaluation::normalize_response`]
//! turns whatever the model returns into a guaranteed-shape [`evaluation::EvaluationResult`].

pub mod checker;
pub mod completion;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod prompt;
pub mod telemetry;
