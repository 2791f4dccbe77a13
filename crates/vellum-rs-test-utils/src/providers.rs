//! Scripted model providers for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use vellum_rs_core::UsageMetrics;
use vellum_rs_providers::{Completion, ModelProvider, ProviderError};

/// Provider returning a fixed response and counting invocations.
#[derive(Debug)]
pub struct FixedProvider {
    response: String,
    tokens: Option<u64>,
    calls: Mutex<Vec<String>>,
}

impl FixedProvider {
    /// Provider answering every prompt with the given text.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            tokens: Some(12),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Override the token count reported with each completion.
    pub fn with_tokens(mut self, tokens: Option<u64>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Prompts received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ModelProvider for FixedProvider {
    async fn complete(&self, prompt: &str, _model: &str) -> Result<Completion, ProviderError> {
        self.calls.lock().push(prompt.to_string());
        Ok(Completion {
            text: self.response.clone(),
            usage: UsageMetrics {
                tokens: self.tokens,
                latency_ms: Some(1),
                cost_usd: None,
            },
        })
    }
}

/// Provider failing every call with an API error.
#[derive(Debug, Default)]
pub struct FailingProvider;

#[async_trait]
impl ModelProvider for FailingProvider {
    async fn complete(&self, _prompt: &str, _model: &str) -> Result<Completion, ProviderError> {
        Err(ProviderError::Api("scripted failure".to_string()))
    }
}
