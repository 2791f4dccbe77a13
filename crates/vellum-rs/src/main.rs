//! Command-line client for the Vellum prompt store.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use vellum_rs_config::VellumConfig;
use vellum_rs_core::PromptStore;

/// Command-line options for the Vellum client.
#[derive(Parser)]
#[command(name = "vellum", version, about = "Git-style version control for model prompts")]
struct Cli {
    /// Optional path to a config.json5 file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a prompt store in the current directory
    Init,
    /// Save a new prompt version
    Save(commands::save::SaveArgs),
    /// Create a variant of an existing prompt
    Fork(commands::fork::ForkArgs),
    /// List saved prompts, newest first
    List(commands::list::ListArgs),
    /// Search prompts by field substring
    Search(commands::search::SearchArgs),
    /// Print a stored prompt with its response and metadata
    Show {
        /// Record id
        id: String,
    },
    /// Write a stored prompt's text back to a file
    Restore(commands::restore::RestoreArgs),
    /// Show differences between two prompt versions
    Diff(commands::diff::DiffArgs),
    /// Show the ancestor chain and descendant tree of a prompt
    Lineage {
        /// Record id
        id: String,
    },
    /// Flag variants whose parent changed after they were created
    CheckOutdated,
    /// Run an A/B comparison between two prompts
    Test(commands::test::TestArgs),
    /// Rebuild the tag index from record files
    Reindex,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        VellumConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        let layered = VellumConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };

    let store = PromptStore::open(&config.store.path).context("failed to open prompt store")?;

    match cli.command {
        Command::Init => commands::init::run(&store),
        Command::Save(args) => commands::save::run(&store, &config, args).await,
        Command::Fork(args) => commands::fork::run(&store, &config, args).await,
        Command::List(args) => commands::list::run(&store, args),
        Command::Search(args) => commands::search::run(&store, args),
        Command::Show { id } => commands::restore::show(&store, &id),
        Command::Restore(args) => commands::restore::run(&store, args),
        Command::Diff(args) => commands::diff::run(&store, args),
        Command::Lineage { id } => commands::lineage::run(&store, &id),
        Command::CheckOutdated => commands::outdated::run(&store),
        Command::Test(args) => commands::test::run(&store, &config, args).await,
        Command::Reindex => commands::reindex::run(&store),
    }
}
