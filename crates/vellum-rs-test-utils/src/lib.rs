//! Test helpers shared across Vellum crates.

pub mod providers;
pub mod store;

pub use providers::{FailingProvider, FixedProvider};
pub use store::TempStore;
