//! Configuration schema for Vellum.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote kinds accepted as extension points; nothing is synced yet.
pub const SUPPORTED_REMOTE_KINDS: &[&str] = &["s3", "github", "rest"];

/// Root config for the Vellum CLI and store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VellumConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl VellumConfig {
    /// Validate cross-field constraints after layers are merged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote
            && !SUPPORTED_REMOTE_KINDS.contains(&remote.kind.as_str())
        {
            return Err(ConfigError::InvalidField {
                path: "remote.kind".to_string(),
                message: format!(
                    "unknown remote type '{}', expected one of: {}",
                    remote.kind,
                    SUPPORTED_REMOTE_KINDS.join(", ")
                ),
            });
        }
        Ok(())
    }
}

/// Location of the on-disk store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store root directory, resolved relative to the working directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Default store root directory.
fn default_store_path() -> String {
    ".vellum".to_string()
}

/// Model provider configuration used when executing prompts on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Provider identifier (`openai`, `anthropic`, `llama`).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model name within the provider.
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Maximum tokens requested per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            name: default_model_name(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Default provider identifier.
fn default_provider() -> String {
    "openai".to_string()
}

/// Default model name.
fn default_model_name() -> String {
    "gpt-4".to_string()
}

/// Default max tokens per completion.
fn default_max_tokens() -> u32 {
    2000
}

/// Remote storage declaration; accepted and validated but never synced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Remote kind; must be one of [`SUPPORTED_REMOTE_KINDS`].
    pub kind: String,
    /// Kind-specific settings (bucket, repo, url, ...).
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::VellumConfig;
    use crate::ConfigError;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_usable() {
        let config = VellumConfig::default();
        assert_eq!(config.store.path, ".vellum");
        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.name, "gpt-4");
        assert!(config.remote.is_none());
        config.validate().expect("valid");
    }

    #[test]
    fn unknown_remote_kind_is_rejected() {
        let config: VellumConfig =
            serde_json::from_str(r#"{"remote": {"kind": "ftp", "url": "ftp://x"}}"#)
                .expect("decode");
        let err = config.validate().expect_err("invalid remote");
        assert!(matches!(err, ConfigError::InvalidField { path, .. } if path == "remote.kind"));
    }

    #[test]
    fn supported_remote_kinds_pass_validation() {
        for kind in ["s3", "github", "rest"] {
            let raw = format!(r#"{{"remote": {{"kind": "{kind}"}}}}"#);
            let config: VellumConfig = serde_json::from_str(&raw).expect("decode");
            config.validate().expect("valid remote");
        }
    }
}
