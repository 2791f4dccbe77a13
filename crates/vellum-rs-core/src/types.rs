//! Record model shared across the store API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default branch label for new records.
pub const DEFAULT_BRANCH: &str = "main";

/// Stored prompt record.
///
/// Everything except `metadata` is immutable once written. The persisted
/// `tags` field holds the tags supplied at creation so the tag index can be
/// rebuilt from record files alone; reads replace it with the authoritative
/// set joined from the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptRecord {
    /// Record identifier.
    pub id: String,
    /// Prompt body.
    pub text: String,
    /// Captured model response, when the prompt was executed.
    #[serde(default)]
    pub response: Option<String>,
    /// Label of the model that produced `response`.
    #[serde(default)]
    pub model: Option<String>,
    /// Creation timestamp; drives both ordering and staleness checks.
    pub created_at: DateTime<Utc>,
    /// Parent record id, when this record is a variant.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Advisory branch label.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Mutable metadata attached to the record.
    #[serde(default)]
    pub metadata: RecordMetadata,
    /// Tag set for the record.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

/// Caller input for creating a record.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    /// Prompt body; must be non-empty.
    pub text: String,
    /// Response text captured from an execution, if any.
    pub response: Option<String>,
    /// Model label for the response.
    pub model: Option<String>,
    /// Parent record id; must already exist.
    pub parent_id: Option<String>,
    /// Branch label; defaults to [`DEFAULT_BRANCH`].
    pub branch: Option<String>,
    /// Tags to register for the record.
    pub tags: Vec<String>,
    /// Initial metadata.
    pub metadata: RecordMetadata,
}

/// Origin of a prompt body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptSource {
    /// Passed inline on the command line.
    Cli,
    /// Read from a file.
    File,
    /// Submitted through an API caller.
    Api,
}

/// Usage metrics reported by a model execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UsageMetrics {
    /// Total token count.
    #[serde(default)]
    pub tokens: Option<u64>,
    /// Wall-clock latency in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<u64>,
    /// Cost in USD, when the provider reports one.
    #[serde(default)]
    pub cost_usd: Option<f64>,
}

/// Outcome of one A/B comparison run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    /// When the comparison ran.
    pub timestamp: DateTime<Utc>,
    /// Shared id linking the entries written to both compared records.
    pub comparison_id: String,
    /// Averaged metrics for this record's side of the comparison.
    pub metrics: UsageMetrics,
}

/// CI pipeline information attached after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CiInfo {
    /// Pipeline name.
    pub pipeline: String,
    /// Run identifier.
    pub run_id: String,
    /// Final status of the run.
    pub status: CiStatus,
}

/// CI run status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CiStatus {
    Passed,
    Failed,
    Skipped,
}

/// Mutable record metadata: known fields plus an open extension bag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecordMetadata {
    /// Whether the prompt was executed when saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed: Option<bool>,
    /// Where the prompt body came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PromptSource>,
    /// Metrics from the execution that produced `response`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<UsageMetrics>,
    /// Accumulated A/B test results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_results: Vec<TestResult>,
    /// CI information, when attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci: Option<CiInfo>,
    /// Open extension bag for auxiliary attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial metadata for merge updates; absent fields leave the record
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MetadataPatch {
    #[serde(default)]
    pub executed: Option<bool>,
    #[serde(default)]
    pub source: Option<PromptSource>,
    #[serde(default)]
    pub metrics: Option<UsageMetrics>,
    /// Entries to append to the record's accumulated test results.
    #[serde(default)]
    pub test_results: Vec<TestResult>,
    #[serde(default)]
    pub ci: Option<CiInfo>,
    /// Extension-bag entries merged key by key.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordMetadata {
    /// Shallow-merge a patch into this metadata.
    ///
    /// Known scalar fields replace when the patch carries them,
    /// `test_results` entries append, and extension-bag keys replace
    /// unless both sides hold arrays, in which case the incoming elements
    /// append.
    pub fn merge(&mut self, patch: MetadataPatch) {
        if patch.executed.is_some() {
            self.executed = patch.executed;
        }
        if patch.source.is_some() {
            self.source = patch.source;
        }
        if patch.metrics.is_some() {
            self.metrics = patch.metrics;
        }
        if patch.ci.is_some() {
            self.ci = patch.ci;
        }
        self.test_results.extend(patch.test_results);
        for (key, incoming) in patch.extra {
            match (self.extra.get_mut(&key), incoming) {
                (Some(Value::Array(existing)), Value::Array(new_items)) => {
                    existing.extend(new_items);
                }
                (_, incoming) => {
                    self.extra.insert(key, incoming);
                }
            }
        }
    }
}
