//! High-level flows stitching the store and model providers together.
//!
//! The CLI wires these with a registry-built provider; tests drive them
//! with scripted mocks.

use chrono::Utc;
use log::info;
use thiserror::Error;
use vellum_rs_core::{
    MetadataPatch, PromptRecord, PromptSource, PromptStore, RecordDraft, StoreError, TestResult,
    UsageMetrics, new_record_id,
};
use vellum_rs_providers::{ModelProvider, ProviderError};

/// Tag automatically applied to forked variants.
pub const VARIANT_TAG: &str = "variant";

/// Errors from the combined save/fork/compare flows.
#[derive(Debug, Error)]
pub enum OpsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Input for saving a prompt, with or without execution.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Prompt body.
    pub text: String,
    /// Model name recorded on the record and used for execution.
    pub model: String,
    /// Tags to register.
    pub tags: Vec<String>,
    /// Branch label override.
    pub branch: Option<String>,
    /// Parent record id for variants.
    pub parent_id: Option<String>,
    /// Where the prompt body came from.
    pub source: PromptSource,
}

/// Save a prompt, executing it first when a provider is supplied.
///
/// The record captures whatever the provider returned, along with
/// `executed`, `source`, and usage metrics; a provider failure aborts the
/// save so no half-executed record is written.
pub async fn save_prompt(
    store: &PromptStore,
    provider: Option<&dyn ModelProvider>,
    request: SaveRequest,
) -> Result<PromptRecord, OpsError> {
    let mut response = None;
    let mut metrics = None;
    if let Some(provider) = provider {
        let completion = provider.complete(&request.text, &request.model).await?;
        response = Some(completion.text);
        metrics = Some(completion.usage);
    }

    let metadata = vellum_rs_core::RecordMetadata {
        executed: Some(provider.is_some()),
        source: Some(request.source),
        metrics,
        ..Default::default()
    };

    let record = store.create(RecordDraft {
        text: request.text,
        response,
        model: Some(request.model),
        parent_id: request.parent_id,
        branch: request.branch,
        tags: request.tags,
        metadata,
    })?;
    Ok(record)
}

/// Fork a parent into a new variant.
///
/// The variant inherits the parent's text unless an override is given,
/// always carries the `variant` tag, and fails `NotFound` before any
/// provider call when the parent is missing.
pub async fn fork_prompt(
    store: &PromptStore,
    provider: Option<&dyn ModelProvider>,
    parent_id: &str,
    mut request: SaveRequest,
) -> Result<PromptRecord, OpsError> {
    let parent = store.get(parent_id)?;
    if request.text.is_empty() {
        request.text = parent.text;
    }
    if !request.tags.iter().any(|tag| tag == VARIANT_TAG) {
        request.tags.push(VARIANT_TAG.to_string());
    }
    request.parent_id = Some(parent.id);
    save_prompt(store, provider, request).await
}

/// Averaged metrics for one side of an A/B comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSide {
    /// Record the samples ran against.
    pub record_id: String,
    /// Mean token count across samples.
    pub avg_tokens: f64,
    /// Mean latency across samples, in milliseconds.
    pub avg_latency_ms: f64,
}

/// Outcome of an A/B comparison between two records.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    /// Shared id written into both records' test results.
    pub comparison_id: String,
    pub first: ComparisonSide,
    pub second: ComparisonSide,
}

/// Run both prompts `samples` times, append a test result to each
/// record's metadata, and return the averaged report.
pub async fn run_comparison(
    store: &PromptStore,
    provider: &dyn ModelProvider,
    first_id: &str,
    second_id: &str,
    model: &str,
    samples: u32,
) -> Result<ComparisonReport, OpsError> {
    let samples = samples.max(1);
    let first = store.get(first_id)?;
    let second = store.get(second_id)?;

    let first_side = sample_prompt(provider, &first, model, samples).await?;
    let second_side = sample_prompt(provider, &second, model, samples).await?;

    let comparison_id = new_record_id();
    let timestamp = Utc::now();
    for side in [&first_side, &second_side] {
        store.update_metadata(
            &side.record_id,
            MetadataPatch {
                test_results: vec![TestResult {
                    timestamp,
                    comparison_id: comparison_id.clone(),
                    metrics: UsageMetrics {
                        tokens: Some(side.avg_tokens.round() as u64),
                        latency_ms: Some(side.avg_latency_ms.round() as u64),
                        cost_usd: None,
                    },
                }],
                ..MetadataPatch::default()
            },
        )?;
    }
    info!(
        "comparison recorded (comparison_id={comparison_id}, first={first_id}, second={second_id}, samples={samples})"
    );

    Ok(ComparisonReport {
        comparison_id,
        first: first_side,
        second: second_side,
    })
}

/// Run one record's prompt `samples` times and average the usage.
async fn sample_prompt(
    provider: &dyn ModelProvider,
    record: &PromptRecord,
    model: &str,
    samples: u32,
) -> Result<ComparisonSide, OpsError> {
    let mut total_tokens = 0u64;
    let mut total_latency = 0u64;
    for _ in 0..samples {
        let completion = provider.complete(&record.text, model).await?;
        total_tokens += completion.usage.tokens.unwrap_or_default();
        total_latency += completion.usage.latency_ms.unwrap_or_default();
    }
    Ok(ComparisonSide {
        record_id: record.id.clone(),
        avg_tokens: total_tokens as f64 / samples as f64,
        avg_latency_ms: total_latency as f64 / samples as f64,
    })
}
