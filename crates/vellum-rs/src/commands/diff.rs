//! Line diff between two stored prompts.

use super::format_timestamp;
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use similar::TextDiff;
use vellum_rs_core::{PromptRecord, PromptStore};

#[derive(Args)]
pub struct DiffArgs {
    /// First record id
    pub first: String,
    /// Second record id
    pub second: String,
    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

pub fn run(store: &PromptStore, args: DiffArgs) -> anyhow::Result<()> {
    let first = store
        .get(&args.first)
        .with_context(|| format!("no prompt found with ID: {}", args.first))?;
    let second = store
        .get(&args.second)
        .with_context(|| format!("no prompt found with ID: {}", args.second))?;

    let diff = TextDiff::from_lines(first.text.as_str(), second.text.as_str());
    let mut unified = diff.unified_diff();
    unified.context_radius(3).header(
        &format!("{}.txt", first.id),
        &format!("{}.txt", second.id),
    );
    let patch = unified.to_string();

    for line in patch.lines() {
        if args.no_color {
            println!("{line}");
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with('@') {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }

    print_metadata_comparison(&first, &second);
    Ok(())
}

/// Created/model/tags comparison printed after the patch.
fn print_metadata_comparison(first: &PromptRecord, second: &PromptRecord) {
    println!("\nMetadata Comparison:");
    println!("{}", "Created:".cyan());
    println!("{}: {}", first.id, format_timestamp(&first.created_at));
    println!("{}: {}", second.id, format_timestamp(&second.created_at));

    println!("{}", "\nModel:".cyan());
    println!("{}: {}", first.id, first.model.as_deref().unwrap_or("N/A"));
    println!("{}: {}", second.id, second.model.as_deref().unwrap_or("N/A"));

    if !first.tags.is_empty() || !second.tags.is_empty() {
        println!("{}", "\nTags:".cyan());
        println!("{}: {}", first.id, join_or_none(&first.tags));
        println!("{}: {}", second.id, join_or_none(&second.tags));
    }
}

fn join_or_none(tags: &[String]) -> String {
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}
