//! Save a new prompt version, executing it unless told otherwise.

use anyhow::{Context, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use vellum_rs::ops::{SaveRequest, save_prompt};
use vellum_rs_config::{ModelConfig, VellumConfig};
use vellum_rs_core::{PromptSource, PromptStore};
use vellum_rs_providers::{ModelProvider, build_provider};

#[derive(Args)]
pub struct SaveArgs {
    /// Prompt text
    #[arg(short, long)]
    pub prompt: Option<String>,
    /// Load the prompt from a file
    #[arg(short, long, conflicts_with = "prompt")]
    pub file: Option<PathBuf>,
    /// Model to execute against
    #[arg(short, long)]
    pub model: Option<String>,
    /// Tags for the prompt
    #[arg(short, long, num_args = 1..)]
    pub tags: Vec<String>,
    /// Branch label for the record
    #[arg(long)]
    pub branch: Option<String>,
    /// Save the prompt without executing it
    #[arg(long)]
    pub no_execute: bool,
}

pub async fn run(
    store: &PromptStore,
    config: &VellumConfig,
    args: SaveArgs,
) -> anyhow::Result<()> {
    let Some((text, source)) = resolve_text(&args)? else {
        bail!("no prompt provided; pass --prompt or --file");
    };
    let request = SaveRequest {
        text,
        model: model_name(config, &args),
        tags: args.tags.clone(),
        branch: args.branch.clone(),
        parent_id: None,
        source,
    };
    let provider = resolve_provider(config, &args)?;
    let record = save_prompt(store, provider.as_deref(), request)
        .await
        .context("failed to save prompt")?;

    println!(
        "{}",
        format!("Prompt saved with ID: {}", record.id).green()
    );
    if let Some(response) = &record.response {
        println!("\nResponse:");
        println!("{}", response.cyan());
    }
    Ok(())
}

/// Resolve the prompt body from flags; `None` when neither was given.
pub(crate) fn resolve_text(args: &SaveArgs) -> anyhow::Result<Option<(String, PromptSource)>> {
    if let Some(prompt) = &args.prompt {
        return Ok(Some((prompt.clone(), PromptSource::Cli)));
    }
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt file {}", path.display()))?;
        return Ok(Some((text, PromptSource::File)));
    }
    Ok(None)
}

/// Model name for the record: flag override, else config.
pub(crate) fn model_name(config: &VellumConfig, args: &SaveArgs) -> String {
    args.model
        .clone()
        .unwrap_or_else(|| config.model.name.clone())
}

/// Build a provider unless execution was disabled.
pub(crate) fn resolve_provider(
    config: &VellumConfig,
    args: &SaveArgs,
) -> anyhow::Result<Option<Arc<dyn ModelProvider>>> {
    if args.no_execute {
        return Ok(None);
    }
    let model_config = ModelConfig {
        provider: config.model.provider.clone(),
        name: model_name(config, args),
        max_tokens: config.model.max_tokens,
    };
    let provider = build_provider(&model_config).context("failed to configure model provider")?;
    Ok(Some(provider))
}
