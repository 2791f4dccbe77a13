//! Search prompts by field substring.

use super::list::record_table;
use clap::Args;
use colored::Colorize;
use vellum_rs_core::PromptStore;

#[derive(Args)]
pub struct SearchArgs {
    /// Search term
    pub query: String,
    /// Field to search in (text|response|tags)
    #[arg(long = "in", default_value = "text")]
    pub field: String,
}

pub fn run(store: &PromptStore, args: SearchArgs) -> anyhow::Result<()> {
    let records = store.search(&args.query, &args.field)?;
    if records.is_empty() {
        println!(
            "{}",
            format!("No prompts found matching \"{}\"", args.query).yellow()
        );
        return Ok(());
    }
    println!(
        "{}",
        format!("\nFound {} matching prompts:\n", records.len()).green()
    );
    println!("{}", record_table(&records));
    Ok(())
}
