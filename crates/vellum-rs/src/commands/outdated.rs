//! Report variants whose parent changed after they were created.

use super::preview;
use colored::Colorize;
use vellum_rs_core::PromptStore;

pub fn run(store: &PromptStore) -> anyhow::Result<()> {
    let outdated = store.check_outdated()?;

    if outdated.is_empty() {
        println!("{}", "✓ All prompts are up to date!".green());
        return Ok(());
    }

    let plural = if outdated.len() == 1 { "" } else { "s" };
    println!(
        "{}",
        format!("\n⚠ Found {} outdated prompt{plural}:", outdated.len()).yellow()
    );

    for entry in &outdated {
        println!(
            "\n{}",
            format!("• {} (child of {})", entry.record.id, entry.parent.id).yellow()
        );
        println!(
            "  {}",
            format!("Parent updated: {}", entry.parent.created_at).bright_black()
        );
        println!(
            "  {}",
            format!("Variant created: {}", entry.record.created_at).bright_black()
        );
        println!("  {}", format!("Reason: {}", entry.reason).bright_black());

        println!("  {}", "\nParent prompt:".white());
        println!(
            "  {}",
            format!("\"{}\"", preview(&entry.parent.text, 100)).cyan()
        );
        println!("  {}", "\nVariant prompt:".white());
        println!(
            "  {}",
            format!("\"{}\"", preview(&entry.record.text, 100)).cyan()
        );
    }

    println!(
        "\n{}",
        "To update a prompt, create a new variant from the parent using:".yellow()
    );
    println!("{}", "vellum fork <parent-id> --prompt \"...\"".cyan());
    Ok(())
}
