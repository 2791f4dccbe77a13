//! Registry of supported providers and their requirements.

use crate::anthropic::AnthropicProvider;
use crate::error::ProviderError;
use crate::openai::OpenAiProvider;
use crate::provider::ModelProvider;
use log::info;
use std::sync::Arc;
use vellum_rs_config::ModelConfig;

/// Static description of one supported provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDescriptor {
    /// Provider id used in config.
    pub id: &'static str,
    /// Human-friendly label.
    pub label: &'static str,
    /// Models the provider accepts.
    pub models: &'static [&'static str],
    /// Environment variables that must be set before use.
    pub required_env: &'static [&'static str],
}

/// Providers the CLI can execute prompts through.
pub const SUPPORTED_PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        id: "openai",
        label: "OpenAI",
        models: &["gpt-4", "gpt-3.5-turbo"],
        required_env: &["OPENAI_API_KEY"],
    },
    ProviderDescriptor {
        id: "anthropic",
        label: "Anthropic",
        models: &["claude-3-opus", "claude-3-sonnet"],
        required_env: &["ANTHROPIC_API_KEY"],
    },
    ProviderDescriptor {
        id: "llama",
        label: "LLaMA",
        models: &["llama-2-7b", "llama-2-13b", "llama-2-70b"],
        required_env: &["LLAMA_API_URL", "LLAMA_API_KEY"],
    },
];

/// Look up a provider descriptor by id.
pub fn descriptor(id: &str) -> Option<&'static ProviderDescriptor> {
    SUPPORTED_PROVIDERS
        .iter()
        .find(|descriptor| descriptor.id == id)
}

/// Build a provider from config, validating provider id, model name, and
/// required environment before any network traffic.
pub fn build_provider(config: &ModelConfig) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_env(config, |name| std::env::var(name).ok())
}

/// [`build_provider`] with an injectable environment lookup.
pub fn build_provider_with_env(
    config: &ModelConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let descriptor = descriptor(&config.provider)
        .ok_or_else(|| ProviderError::UnsupportedProvider(config.provider.clone()))?;
    if !descriptor.models.contains(&config.name.as_str()) {
        return Err(ProviderError::UnsupportedModel {
            provider: config.provider.clone(),
            model: config.name.clone(),
        });
    }
    for name in descriptor.required_env {
        if env(name).is_none_or(|value| value.is_empty()) {
            return Err(ProviderError::MissingEnv((*name).to_string()));
        }
    }
    info!(
        "building model provider (provider={}, model={})",
        descriptor.label, config.name
    );

    let lookup = |name: &str| env(name).unwrap_or_default();
    let provider: Arc<dyn ModelProvider> = match descriptor.id {
        "openai" => Arc::new(OpenAiProvider::new(lookup("OPENAI_API_KEY"))),
        "anthropic" => Arc::new(AnthropicProvider::new(
            lookup("ANTHROPIC_API_KEY"),
            config.max_tokens,
        )),
        // LLaMA deployments speak the OpenAI chat API behind their own URL.
        _ => Arc::new(OpenAiProvider::with_base_url(
            lookup("LLAMA_API_KEY"),
            lookup("LLAMA_API_URL"),
        )),
    };
    Ok(provider)
}
