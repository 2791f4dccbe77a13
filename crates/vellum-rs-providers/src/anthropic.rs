//! Anthropic messages API client.

use crate::error::ProviderError;
use crate::provider::{Completion, ModelProvider};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use vellum_rs_core::UsageMetrics;

const BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic messages endpoint.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Client with the given key and per-completion token budget.
    pub fn new(api_key: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            max_tokens,
        }
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str, model: &str) -> Result<Completion, ProviderError> {
        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            messages: vec![MessageInput {
                role: "user",
                content: prompt,
            }],
        };
        let started = Instant::now();
        let response = self
            .client
            .post(format!("{BASE_URL}/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{status}: {body}")));
        }
        let body: MessagesResponse = response.json().await?;
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!("message completion finished (model={model}, latency_ms={latency_ms})");
        completion_from_response(body, latency_ms)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageInput<'a>>,
}

#[derive(Serialize)]
struct MessageInput<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
}

/// Map a decoded response body onto the provider-neutral completion.
fn completion_from_response(
    response: MessagesResponse,
    latency_ms: u64,
) -> Result<Completion, ProviderError> {
    let text = response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or(ProviderError::EmptyResponse)?;
    let tokens = response.usage.map(|usage| {
        usage.input_tokens.unwrap_or_default() + usage.output_tokens.unwrap_or_default()
    });
    Ok(Completion {
        text,
        usage: UsageMetrics {
            tokens,
            latency_ms: Some(latency_ms),
            cost_usd: None,
        },
    })
}
