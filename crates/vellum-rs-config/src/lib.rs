//! Configuration models and layered config loading.
//!
//! This crate owns the Vellum config schema, validation, and the
//! user-then-project layer merging used by the CLI.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layer metadata exposed alongside the merged config.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig};
/// Configuration schema models.
pub use model::*;
