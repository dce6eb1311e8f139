//! Front matter extraction.
//!
//! A leading YAML block between `---` fences is parsed into a free-form
//! key/value map and stripped from the rendered body. Rendering the metadata
//! into a page is the page layout's concern, not this crate's.

use std::collections::HashMap;

/// Parsed front matter: free-form keys with structured values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrontMatter {
    entries: HashMap<String, serde_json::Value>,
}

impl FrontMatter {
    /// Parse a raw YAML mapping.
    ///
    /// # Errors
    ///
    /// Returns the underlying YAML error when the block is not a valid
    /// mapping. Callers degrade gracefully rather than failing conversion.
    pub fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        let entries = serde_yaml::from_str(raw)?;
        Ok(Self { entries })
    }

    /// Value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// The `title` entry, when it is a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(serde_json::Value::as_str)
    }

    /// The `description` entry, when it is a string.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(serde_json::Value::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries (unspecified order).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_values() {
        let fm = FrontMatter::parse("title: My Page\ndraft: true\nweight: 3\n").unwrap();

        assert_eq!(fm.title(), Some("My Page"));
        assert_eq!(fm.get("draft"), Some(&serde_json::json!(true)));
        assert_eq!(fm.get("weight"), Some(&serde_json::json!(3)));
        assert!(fm.get("missing").is_none());
    }

    #[test]
    fn test_parse_structured_values() {
        let fm = FrontMatter::parse("tags:\n  - rust\n  - docs\n").unwrap();

        assert_eq!(fm.get("tags"), Some(&serde_json::json!(["rust", "docs"])));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(FrontMatter::parse("{{not yaml").is_err());
    }

    #[test]
    fn test_non_string_title_ignored() {
        let fm = FrontMatter::parse("title: 42\n").unwrap();

        assert!(fm.title().is_none());
        assert_eq!(fm.get("title"), Some(&serde_json::json!(42)));
    }

    #[test]
    fn test_description() {
        let fm = FrontMatter::parse("description: Overview page\n").unwrap();

        assert_eq!(fm.description(), Some("Overview page"));
    }

    #[test]
    fn test_empty() {
        let fm = FrontMatter::default();
        assert!(fm.is_empty());
        assert_eq!(fm.iter().count(), 0);
    }
}
