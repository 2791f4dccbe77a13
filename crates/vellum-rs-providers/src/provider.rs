//! Provider abstraction consumed by the CLI.

use crate::error::ProviderError;
use async_trait::async_trait;
use vellum_rs_core::UsageMetrics;

/// One completed model execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Response text.
    pub text: String,
    /// Usage metrics; latency is wall-clock when the provider reports
    /// nothing better.
    pub usage: UsageMetrics,
}

/// Model execution abstraction.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Execute a prompt against a named model.
    async fn complete(&self, prompt: &str, model: &str) -> Result<Completion, ProviderError>;
}
