use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion service rejected the request: {0}")]
    Rejected(String),
    #[error("completion service returned no content")]
    Empty,
}

/// Prompt in, text out.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Chat-completions client for OpenAI and API-compatible services.
#[derive(Clone)]
pub struct OpenAiCompletion {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompletion {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.openai_temperature,
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl Completion for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let response = self.http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages: [RequestMessage { role: "user", content: prompt }],
                temperature: self.temperature,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Rejected(format!("{status}: {body}")));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::{HeaderMap, StatusCode}, routing::post};
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/v1")
    }

    #[tokio::test]
    async fn sends_prompt_and_returns_first_choice() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "gpt-4o-mini");
                assert_eq!(body["messages"][0]["role"], "user");
                let echoed = body["messages"][0]["content"].as_str().unwrap().to_uppercase();
                Json(json!({ "choices": [{ "message": { "role": "assistant", "content": echoed } }] }))
            }),
        );
        let completion = OpenAiCompletion::new(serve(app).await, "sk-test", "gpt-4o-mini", 0.7);

        assert_eq!(completion.complete("find partners").await.unwrap(), "FIND PARTNERS");
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let completion = OpenAiCompletion::new(serve(app).await, "sk-test", "gpt-4o-mini", 0.7);

        let err = completion.complete("hi").await.unwrap_err();
        assert!(matches!(err, CompletionError::Rejected(ref msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [{ "message": { "content": null } }] })) }),
        );
        let completion = OpenAiCompletion::new(serve(app).await, "sk-test", "gpt-4o-mini", 0.7);

        assert!(matches!(completion.complete("hi").await, Err(CompletionError::Empty)));
    }
}
