//! List saved prompts as a table or JSON.

use super::{format_timestamp, preview};
use clap::{Args, ValueEnum};
use colored::Colorize;
use tabled::{Table, Tabled};
use vellum_rs_core::{PromptRecord, PromptStore};

#[derive(Args)]
pub struct ListArgs {
    /// Number of prompts to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
    /// Filter by tag
    #[arg(short, long)]
    pub tag: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn run(store: &PromptStore, args: ListArgs) -> anyhow::Result<()> {
    let records = store.list(args.limit, args.tag.as_deref())?;
    if records.is_empty() {
        println!("{}", "No prompts found".yellow());
        return Ok(());
    }
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Table => println!("{}", record_table(&records)),
    }
    Ok(())
}

/// Row shape shared by the list and search tables.
#[derive(Tabled)]
pub(crate) struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Prompt")]
    prompt: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Created At")]
    created_at: String,
}

impl From<&PromptRecord> for RecordRow {
    fn from(record: &PromptRecord) -> Self {
        Self {
            id: record.id.clone(),
            prompt: preview(&record.text, 50),
            model: record.model.clone().unwrap_or_else(|| "N/A".to_string()),
            tags: record.tags.join(", "),
            created_at: format_timestamp(&record.created_at),
        }
    }
}

/// Render records as the shared five-column table.
pub(crate) fn record_table(records: &[PromptRecord]) -> Table {
    Table::new(records.iter().map(RecordRow::from))
}
