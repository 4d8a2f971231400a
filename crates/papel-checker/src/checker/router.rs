use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{error, warn};

use super::{CheckError, CheckOutcome, EssayChecker};
use crate::completion::CompletionClient;
use crate::error::AppError;

/// Body of `POST /check`; a missing essay is reported as 400, not 422.
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub essay: Option<String>,
}

/// Router exposing the essay check endpoint.
pub fn check_router<C>(checker: Arc<EssayChecker<C>>) -> Router
where
    C: CompletionClient + 'static,
{
    Router::new()
        .route("/check", post(check_handler::<C>))
        .with_state(checker)
}

pub(crate) async fn check_handler<C>(
    State(checker): State<Arc<EssayChecker<C>>>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckOutcome>, AppError>
where
    C: CompletionClient + 'static,
{
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "rejected check request body");
        AppError::from(rejection)
    })?;
    let essay = request.essay.unwrap_or_default();
    match checker.check(&essay).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(err) => {
            if let CheckError::Completion(source) = &err {
                error!(error = %source, "essay check failed");
            }
            Err(err.into())
        }
    }
}
