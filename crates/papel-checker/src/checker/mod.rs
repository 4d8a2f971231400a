//! Request-level orchestration: validate, prompt, call the model, normalize.

mod router;

pub use router::{check_router, CheckRequest};

use crate::completion::{CompletionClient, CompletionError, TokenUsage};
use crate::evaluation::{normalize_response, EvaluationResult};
use crate::prompt::build_messages;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Evaluation plus the metadata gathered while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub usage: TokenUsage,
    /// Seconds, two decimals.
    #[serde(rename = "processingTime")]
    pub processing_time: String,
}

/// Error raised by the essay checker.
///
/// Malformed model output is not an error; only a missing essay or a failed
/// call to the completion API is.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Essay required")]
    EmptyEssay,
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl CheckError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckError::EmptyEssay => StatusCode::BAD_REQUEST,
            CheckError::Completion(CompletionError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            CheckError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to HTTP callers.
    pub fn client_message(&self) -> String {
        match self {
            CheckError::EmptyEssay => "Essay required".to_string(),
            CheckError::Completion(CompletionError::Unauthorized) => "Auth failed".to_string(),
            CheckError::Completion(CompletionError::RateLimited) => {
                "Rate limit exceeded".to_string()
            }
            CheckError::Completion(CompletionError::Upstream { message, .. }) => message.clone(),
            CheckError::Completion(_) => "Request failed".to_string(),
        }
    }
}

/// Stateless checker; safe to share across concurrent requests.
pub struct EssayChecker<C> {
    client: Arc<C>,
}

impl<C> EssayChecker<C>
where
    C: CompletionClient + 'static,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn check(&self, essay: &str) -> Result<CheckOutcome, CheckError> {
        if essay.trim().is_empty() {
            return Err(CheckError::EmptyEssay);
        }

        let started = Instant::now();
        let completion = self.client.complete(build_messages(essay)).await?;
        let result = normalize_response(&completion.content, essay);
        let processing_time = format!("{:.2}", started.elapsed().as_secs_f64());

        info!(
            processing_time = %processing_time,
            grade = %result.grade,
            corrections = result.corrections.len(),
            "essay checked"
        );

        Ok(CheckOutcome {
            result,
            usage: completion.usage,
            processing_time,
        })
    }
}
