use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use papel_checker::checker::{check_router, EssayChecker};
use papel_checker::completion::CompletionClient;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub(crate) const RUBRIC_NAME: &str = "Filipino Konseptong Papel (4 categories, 20 points max)";

pub(crate) fn with_service_routes<C>(checker: Arc<EssayChecker<C>>) -> axum::Router
where
    C: CompletionClient + 'static,
{
    check_router(checker)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(CorsLayer::permissive())
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "model": state.model.as_ref(),
        "rubric": RUBRIC_NAME,
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use papel_checker::completion::{ChatMessage, Completion, CompletionError, TokenUsage};
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    struct CannedClient;

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
        ) -> Result<Completion, CompletionError> {
            Ok(Completion {
                content: json!({
                    "rubric_scores": { "nilalaman": 5, "kaisahan": 5, "kaayusan": 4, "kaangkupan": 5 },
                    "feedback": "Mahusay."
                })
                .to_string(),
                usage: TokenUsage {
                    prompt_tokens: 120,
                    completion_tokens: 40,
                    total_tokens: 160,
                },
            })
        }

        fn model(&self) -> &str {
            "canned-model"
        }
    }

    fn app(ready: bool) -> axum::Router {
        let checker = Arc::new(EssayChecker::new(Arc::new(CannedClient)));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            model: Arc::from(checker.model()),
        };
        with_service_routes(checker).layer(Extension(state))
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    #[tokio::test]
    async fn health_reports_model_and_rubric() {
        let (status, body) = send(app(true), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "OK", "model": "canned-model", "rubric": RUBRIC_NAME })
        );
    }

    #[tokio::test]
    async fn readiness_tracks_listener_state() {
        let (status, body) = send(app(false), get_request("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = send(app(true), get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn check_route_is_mounted_alongside_probes() {
        let request = Request::builder()
            .method("POST")
            .uri("/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "essay": "Ang wika ay buhay." }).to_string()))
            .expect("request builds");

        let (status, body) = send(app(true), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_score"], 19);
        assert_eq!(body["grade"], "19/20");
        assert_eq!(body["usage"]["promptTokens"], 120);
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let request = Request::builder()
            .method("POST")
            .uri("/check")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "essay": "Ang wika ay buhay." }).to_string()))
            .expect("request builds");

        let response = app(true).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn preflight_is_answered_for_check() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/check")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .expect("request builds");

        let response = app(true).oneshot(request).await.expect("router responds");
        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[tokio::test]
    async fn blank_essay_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/check")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "essay": "   " }).to_string()))
            .expect("request builds");

        let (status, body) = send(app(true), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Essay required" }));
    }
}
