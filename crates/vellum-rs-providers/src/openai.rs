//! OpenAI-compatible chat completions client.

use crate::error::ProviderError;
use crate::provider::{Completion, ModelProvider};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use vellum_rs_core::UsageMetrics;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any endpoint speaking the OpenAI chat completions API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Client against the hosted OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against a compatible endpoint at another base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str, model: &str) -> Result<Completion, ProviderError> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{status}: {body}")));
        }
        let body: ChatResponse = response.json().await?;
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(
            "chat completion finished (model={model}, latency_ms={latency_ms})"
        );
        completion_from_response(body, latency_ms)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: Option<u64>,
}

/// Map a decoded response body onto the provider-neutral completion.
fn completion_from_response(
    response: ChatResponse,
    latency_ms: u64,
) -> Result<Completion, ProviderError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ProviderError::EmptyResponse)?;
    Ok(Completion {
        text,
        usage: UsageMetrics {
            tokens: response.usage.and_then(|usage| usage.total_tokens),
            latency_ms: Some(latency_ms),
            cost_usd: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{ChatResponse, completion_from_response};
    use crate::error::ProviderError;
    use pretty_assertions::assert_eq;

    #[test]
    fn response_maps_onto_completion() {
        let body: ChatResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "Paris"}}],
                "usage": {"prompt_tokens": 4, "completion_tokens": 1, "total_tokens": 5}
            }"#,
        )
        .expect("decode");
        let completion = completion_from_response(body, 80).expect("completion");
        assert_eq!(completion.text, "Paris");
        assert_eq!(completion.usage.tokens, Some(5));
        assert_eq!(completion.usage.latency_ms, Some(80));
    }

    #[test]
    fn empty_choices_are_an_error() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).expect("decode");
        let err = completion_from_response(body, 10).expect_err("empty");
        assert!(matches!(err, ProviderError::EmptyResponse));
    }
}
