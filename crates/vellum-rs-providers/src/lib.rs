//! Model-execution collaborator for the prompt store.
//!
//! The store persists whatever a provider returns; nothing here retries
//! or validates provider-specific semantics beyond surfacing API errors.

mod anthropic;
pub mod error;
mod openai;
pub mod provider;
pub mod registry;

/// Anthropic messages client.
pub use anthropic::AnthropicProvider;
/// Provider error type.
pub use error::ProviderError;
/// OpenAI-compatible chat completions client.
pub use openai::OpenAiProvider;
/// Provider trait and completion result.
pub use provider::{Completion, ModelProvider};
/// Supported-provider registry.
pub use registry::{ProviderDescriptor, SUPPORTED_PROVIDERS, build_provider, descriptor};
