//! Subcommand implementations for the `vellum` binary.

pub mod diff;
pub mod fork;
pub mod init;
pub mod lineage;
pub mod list;
pub mod outdated;
pub mod reindex;
pub mod restore;
pub mod save;
pub mod search;

/// Truncate a prompt body for one-line previews.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Render a timestamp for human-facing tables.
pub(crate) fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::preview;
    use pretty_assertions::assert_eq;

    #[test]
    fn preview_truncates_long_bodies() {
        assert_eq!(preview("short", 50), "short");
        let long = "x".repeat(60);
        let shown = preview(&long, 50);
        assert_eq!(shown.chars().count(), 50);
        assert!(shown.ends_with("..."));
    }
}
