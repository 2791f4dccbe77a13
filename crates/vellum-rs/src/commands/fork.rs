//! Fork an existing prompt into a new variant.

use super::save::{SaveArgs, model_name, resolve_provider, resolve_text};
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use vellum_rs::ops::{SaveRequest, fork_prompt};
use vellum_rs_config::VellumConfig;
use vellum_rs_core::{PromptSource, PromptStore};

#[derive(Args)]
pub struct ForkArgs {
    /// Parent record id
    pub parent_id: String,
    #[command(flatten)]
    pub save: SaveArgs,
}

pub async fn run(
    store: &PromptStore,
    config: &VellumConfig,
    args: ForkArgs,
) -> anyhow::Result<()> {
    // Without --prompt or --file the variant inherits the parent's text.
    let (text, source) = resolve_text(&args.save)?.unwrap_or((String::new(), PromptSource::Cli));
    let request = SaveRequest {
        text,
        model: model_name(config, &args.save),
        tags: args.save.tags.clone(),
        branch: args.save.branch.clone(),
        parent_id: None,
        source,
    };
    let provider = resolve_provider(config, &args.save)?;
    let record = fork_prompt(store, provider.as_deref(), &args.parent_id, request)
        .await
        .with_context(|| format!("failed to fork prompt {}", args.parent_id))?;

    println!(
        "{}",
        format!(
            "Variant saved with ID: {} (parent {})",
            record.id, args.parent_id
        )
        .green()
    );
    if let Some(response) = &record.response {
        println!("\nResponse:");
        println!("{}", response.cyan());
    }
    Ok(())
}
