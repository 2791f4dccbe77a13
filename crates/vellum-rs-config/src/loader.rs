//! Layered configuration loading: defaults, then user, then project.

use crate::{ConfigError, VellumConfig};
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Config filename inside a config directory.
const DEFAULT_CONFIG_FILE: &str = "config.json5";
/// Config directory under the user home or a project root.
const DEFAULT_CONFIG_DIR: &str = ".vellum";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: VellumConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin of a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-wide configuration under the home directory.
    User,
    /// Project configuration under the working directory.
    Project,
}

/// A layer that was found and merged.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Where the layer came from.
    pub source: ConfigLayerSource,
    /// Path the layer was read from.
    pub path: PathBuf,
}

impl VellumConfig {
    /// Load a single config file, validated.
    pub fn load_from_path(path: &Path) -> Result<VellumConfig, ConfigError> {
        let value = read_layer(path)?;
        let config: VellumConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the layered config for a working directory: defaults,
    /// overlaid by the optional user layer, overlaid by the optional
    /// project layer. Later layers win key by key; objects merge deep.
    pub fn load_layered(cwd: &Path) -> Result<LayeredConfig, ConfigError> {
        let mut merged = serde_json::to_value(VellumConfig::default())?;
        let mut layers = Vec::new();

        let candidates = [
            (ConfigLayerSource::User, user_config_path()),
            (
                ConfigLayerSource::Project,
                Some(cwd.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE)),
            ),
        ];
        for (source, path) in candidates {
            let Some(path) = path else {
                continue;
            };
            if !path.exists() {
                debug!(
                    "optional config layer missing (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            let value = read_layer(&path)?;
            merge_json_values(&mut merged, &value);
            layers.push(ConfigLayer { source, path });
        }

        let config: VellumConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(LayeredConfig { config, layers })
    }
}

/// Read and parse one json5 layer.
fn read_layer(path: &Path) -> Result<Value, ConfigError> {
    debug!("loading config layer (path={})", path.display());
    let contents = fs::read_to_string(path)?;
    Ok(json5::from_str(&contents)?)
}

/// Default user config path under the home directory.
fn user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE)
    })
}

/// Merge overlay values into the base, recursively overriding objects.
fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}
