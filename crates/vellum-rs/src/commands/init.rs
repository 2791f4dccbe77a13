//! Initialize the store in the current directory.

use colored::Colorize;
use vellum_rs_core::PromptStore;

pub fn run(store: &PromptStore) -> anyhow::Result<()> {
    // The store layout was already created when the handle was opened.
    println!(
        "{}",
        format!(
            "Initialized prompt version control in {}",
            store.root().display()
        )
        .green()
    );
    println!("\nYou can now start using the following commands:");
    println!("{} - Save a new prompt", "vellum save".cyan());
    println!("{} - List saved prompts", "vellum list".cyan());
    println!("{} - Search prompts", "vellum search".cyan());
    println!("{} - Compare prompt versions", "vellum diff".cyan());
    println!("{} - Restore a previous version\n", "vellum restore".cyan());
    Ok(())
}
