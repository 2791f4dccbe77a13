//! Error types for model providers.

use thiserror::Error;

/// Errors returned while building or invoking a model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider id is not in the registry.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    /// Model name is not offered by the provider.
    #[error("model '{model}' is not supported by provider '{provider}'")]
    UnsupportedModel { provider: String, model: String },
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),
    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("provider error: {0}")]
    Api(String),
    /// The provider answered without any completion text.
    #[error("provider response contained no completion text")]
    EmptyResponse,
}
