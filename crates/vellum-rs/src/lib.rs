//! Public SDK surface for Vellum.
//!
//! This crate re-exports the building blocks and hosts the high-level
//! flows shared by the `vellum` binary and embedding callers.

pub mod ops;

/// Re-export for convenience.
pub use vellum_rs_config as config;
pub use vellum_rs_core as core;
/// Re-export for convenience.
pub use vellum_rs_providers as providers;

/// High-level save/fork/compare flows.
pub use ops::{
    ComparisonReport, ComparisonSide, OpsError, SaveRequest, VARIANT_TAG, fork_prompt,
    run_comparison, save_prompt,
};
