use super::{ChatMessage, Completion, CompletionClient, CompletionError, TokenUsage};
use crate::config::CompletionConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const GENERIC_FAILURE: &str = "Request failed";

/// Client for OpenAI-compatible `/chat/completions` endpoints such as Groq.
#[derive(Debug)]
pub struct GroqClient {
    http: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl GroqClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let CompletionConfig {
            api_key,
            base_url,
            model,
            max_tokens,
            temperature,
            timeout,
        } = config;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
            max_tokens,
            temperature,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout(self.timeout)
        } else {
            CompletionError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, CompletionError> {
        debug!(model = %self.model, endpoint = %self.endpoint, "sending completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.request_body(&messages))
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !(200..300).contains(&status) {
            warn!(status, "completion API returned an error status");
            return Err(classify_failure(status, &body));
        }

        parse_completion(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

fn classify_failure(status: u16, body: &str) -> CompletionError {
    match status {
        401 => CompletionError::Unauthorized,
        429 => CompletionError::RateLimited,
        _ => {
            let message = serde_json::from_str::<ApiErrorBody>(body)
                .ok()
                .and_then(|parsed| parsed.error.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            CompletionError::Upstream { status, message }
        }
    }
}

fn parse_completion(body: &str) -> Result<Completion, CompletionError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|err| CompletionError::MalformedResponse(err.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::MalformedResponse("no message content".to_string()))?;

    let usage = parsed.usage.unwrap_or_default();
    Ok(Completion {
        content,
        usage: TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        },
    })
}
