//! Linear scan/filter over records by field substring.

use crate::error::StoreError;
use crate::store::PromptStore;
use crate::types::PromptRecord;

/// Record attribute a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Prompt body.
    Text,
    /// Captured response.
    Response,
    /// Tag set.
    Tags,
}

impl SearchField {
    /// Parse a field name leniently; unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "prompt" | "body" => Some(SearchField::Text),
            "response" => Some(SearchField::Response),
            "tags" | "tag" => Some(SearchField::Tags),
            _ => None,
        }
    }
}

impl PromptStore {
    /// Case-insensitive substring search over one record field.
    ///
    /// For `tags`, any tag containing the query matches. Unknown field
    /// names match nothing rather than failing, keeping the operation
    /// total. Results come back in store iteration order; callers that
    /// need recency should sort by `created_at`.
    pub fn search(&self, query: &str, field: &str) -> Result<Vec<PromptRecord>, StoreError> {
        let Some(field) = SearchField::parse(field) else {
            return Ok(Vec::new());
        };
        let needle = query.to_lowercase();
        let mut records = self.load_all_joined()?;
        records.retain(|record| match field {
            SearchField::Text => record.text.to_lowercase().contains(&needle),
            SearchField::Response => record
                .response
                .as_ref()
                .is_some_and(|response| response.to_lowercase().contains(&needle)),
            SearchField::Tags => record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle)),
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::SearchField;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_names_parse_leniently() {
        assert_eq!(SearchField::parse("text"), Some(SearchField::Text));
        assert_eq!(SearchField::parse("Prompt"), Some(SearchField::Text));
        assert_eq!(SearchField::parse("response"), Some(SearchField::Response));
        assert_eq!(SearchField::parse("TAGS"), Some(SearchField::Tags));
        assert_eq!(SearchField::parse("created_at"), None);
    }
}
