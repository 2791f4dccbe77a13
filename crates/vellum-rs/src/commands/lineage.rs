//! Render the ancestor chain and descendant tree of a prompt.

use super::{format_timestamp, preview};
use anyhow::Context;
use colored::Colorize;
use vellum_rs_core::{LineageNode, PromptRecord, PromptStore};

pub fn run(store: &PromptStore, id: &str) -> anyhow::Result<()> {
    let lineage = store
        .lineage(id)
        .with_context(|| format!("no prompt found with ID: {id}"))?;

    println!("{}", "\nPrompt Lineage Tree:".bold());
    if !lineage.ancestors.is_empty() {
        println!("{}", "\nAncestors:".yellow());
        for (depth, ancestor) in lineage.ancestors.iter().enumerate() {
            print_node(ancestor, &"  ".repeat(depth), true);
        }
    }

    let subject_prefix = "  ".repeat(lineage.ancestors.len());
    print_node(&lineage.record, &subject_prefix, true);

    if !lineage.descendants.is_empty() {
        println!("{}", "\nDescendants:".yellow());
        let descendants_prefix = "  ".repeat(lineage.ancestors.len() + 1);
        print_tree(&lineage.descendants, &descendants_prefix);
    }
    Ok(())
}

/// Print one node line; returns the prefix continuation for children.
fn print_node(record: &PromptRecord, prefix: &str, is_last: bool) -> String {
    let connector = if is_last { "└─ " } else { "├─ " };
    let child_prefix = if is_last { "   " } else { "│  " };
    println!(
        "{prefix}{connector}{} {} {}",
        record.id.cyan(),
        format!("\"{}\"", preview(&record.text, 50)).white(),
        format_timestamp(&record.created_at).bright_black()
    );
    child_prefix.to_string()
}

fn print_tree(nodes: &[LineageNode], prefix: &str) {
    for (index, node) in nodes.iter().enumerate() {
        let is_last = index == nodes.len() - 1;
        let continuation = print_node(&node.record, prefix, is_last);
        print_tree(&node.children, &format!("{prefix}{continuation}"));
    }
}
