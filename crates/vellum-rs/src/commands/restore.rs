//! Print or restore a stored prompt.

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use vellum_rs_core::PromptStore;

#[derive(Args)]
pub struct RestoreArgs {
    /// Record id to restore
    pub id: String,
    /// Write the prompt text to this file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(store: &PromptStore, args: RestoreArgs) -> anyhow::Result<()> {
    let record = store
        .get(&args.id)
        .with_context(|| format!("no prompt found with ID: {}", args.id))?;

    if let Some(path) = &args.output {
        std::fs::write(path, &record.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "{}",
            format!("Prompt restored to file: {}", path.display()).green()
        );
        return Ok(());
    }
    show(store, &args.id)
}

pub fn show(store: &PromptStore, id: &str) -> anyhow::Result<()> {
    let record = store
        .get(id)
        .with_context(|| format!("no prompt found with ID: {id}"))?;

    println!("\nPrompt:");
    println!("{}", record.text.cyan());
    if let Some(response) = &record.response {
        println!("\nOriginal Response:");
        println!("{}", response.yellow());
    }
    println!("\nMetadata:");
    println!("{}", serde_json::to_string_pretty(&record.metadata)?);
    if !record.tags.is_empty() {
        println!("\nTags: {}", record.tags.join(", "));
    }
    Ok(())
}
