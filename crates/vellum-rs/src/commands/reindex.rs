//! Rebuild the tag index from record files.

use colored::Colorize;
use vellum_rs_core::PromptStore;

pub fn run(store: &PromptStore) -> anyhow::Result<()> {
    let scanned = store.rebuild_tag_index()?;
    println!(
        "{}",
        format!("Tag index rebuilt from {scanned} record(s)").green()
    );
    Ok(())
}
