use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use papel_checker::checker::{check_router, CheckError, EssayChecker};
use papel_checker::completion::{
    ChatMessage, Completion, CompletionClient, CompletionError, TokenUsage,
};
use papel_checker::prompt::SYSTEM_PROMPT;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const ESSAY: &str = "Ang pananaliksik ay tungkol sa wikang Filipino sa paaralan.";

/// Replays one canned reply per call and keeps every prompt it was sent.
struct FakeModel {
    reply: Result<String, fn() -> CompletionError>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeModel {
    fn replying(content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(content.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(make: fn() -> CompletionError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(make),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionClient for FakeModel {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, CompletionError> {
        self.prompts.lock().expect("prompt log poisoned").push(messages);
        match &self.reply {
            Ok(content) => Ok(Completion {
                content: content.clone(),
                usage: TokenUsage {
                    prompt_tokens: 900,
                    completion_tokens: 300,
                    total_tokens: 1200,
                },
            }),
            Err(make) => Err(make()),
        }
    }

    fn model(&self) -> &str {
        "fake-gpt"
    }
}

async fn post_check(model: Arc<FakeModel>, body: Value) -> (StatusCode, Value) {
    let app = check_router(Arc::new(EssayChecker::new(model)));
    let request = Request::builder()
        .method("POST")
        .uri("/check")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn checker_sends_rubric_prompt_and_essay() {
    let model = FakeModel::replying("{}");
    let checker = EssayChecker::new(model.clone());

    checker.check(ESSAY).await.expect("check succeeds");

    let prompts = model.prompts.lock().expect("prompt log poisoned");
    let messages = &prompts[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[0].content, SYSTEM_PROMPT);
    assert_eq!(messages[1].role, "user");
    assert!(messages[1].content.contains(ESSAY));
}

#[tokio::test]
async fn successful_check_returns_normalized_evaluation_with_metadata() {
    let reply = json!({
        "rubric_scores": { "nilalaman": 4, "kaisahan": "4", "kaayusan": 3.6, "kaangkupan": 9 },
        "rubric_feedback": { "nilalaman": "Malinaw ang layunin." },
        "total_score": 99,
        "grade": "17/20",
        "feedback": "Maayos ang papel.",
        "corrections": [
            { "original": "wikang filipino", "suggestion": "wikang Filipino", "explanation": "Pangngalang pantangi", "type": "error" }
        ],
        "strengths": ["Malinaw na paksa"],
        "improvements": ["Palawakin ang metodolohiya"]
    });
    let (status, body) = post_check(FakeModel::replying(reply.to_string()), json!({ "essay": ESSAY })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["rubric_scores"],
        json!({ "nilalaman": 4, "kaisahan": 4, "kaayusan": 4, "kaangkupan": 5 })
    );
    assert_eq!(body["total_score"], 17);
    assert_eq!(body["grade"], "17/20");
    assert_eq!(body["rubric_feedback"]["nilalaman"], "Malinaw ang layunin.");
    assert_eq!(body["corrections"][0]["position"], 31);
    assert_eq!(body["corrections"][0]["index"], 0);
    assert_eq!(body["corrections"][0]["type"], "error");
    assert_eq!(body["usage"], json!({ "promptTokens": 900, "completionTokens": 300, "totalTokens": 1200 }));
    assert!(body["processingTime"]
        .as_str()
        .and_then(|value| value.parse::<f64>().ok())
        .is_some());
}

#[tokio::test]
async fn missing_essay_field_is_a_bad_request() {
    let model = FakeModel::replying("{}");
    let (status, body) = post_check(model.clone(), json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Essay required" }));
    assert!(model.prompts.lock().expect("prompt log poisoned").is_empty());
}

#[tokio::test]
async fn upstream_messages_are_forwarded_on_failure() {
    let model = FakeModel::failing(|| CompletionError::Upstream {
        status: 503,
        message: "Service Unavailable".to_string(),
    });
    let (status, body) = post_check(model, json!({ "essay": ESSAY })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Service Unavailable" }));
}

#[tokio::test]
async fn timeouts_surface_as_generic_failures() {
    let model = FakeModel::failing(|| CompletionError::Timeout(std::time::Duration::from_secs(60)));
    let checker = EssayChecker::new(model);

    let err = checker.check(ESSAY).await.expect_err("timeout propagates");
    assert!(matches!(err, CheckError::Completion(CompletionError::Timeout(_))));
    assert_eq!(err.client_message(), "Request failed");
}
