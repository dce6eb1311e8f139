//! Code block processor stages.
//!
//! The conversion pipeline treats special fenced blocks as an ordered list
//! of independent stages. Each stage implements [`CodeBlockProcessor`];
//! stages are checked in registration order when a fenced block is
//! encountered and the first returning a non-`PassThrough` result wins.
//! Adding or removing a stage never touches the event loop.

use std::collections::HashMap;

use crate::state::escape_html;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with a placeholder for deferred processing.
    ///
    /// The stage's `post_process` replaces placeholders after rendering.
    Placeholder(String),

    /// Replace the code block with inline HTML immediately.
    Inline(String),

    /// Not handled by this stage; fall through to the next one, ending at
    /// the default language-classed code block.
    PassThrough,
}

/// Trait for processing special fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `attrs` - Attributes parsed from the fence (key=value pairs)
    /// * `source` - Raw content of the code block
    /// * `index` - Zero-based index for placeholder generation
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult;

    /// Post-process rendered HTML to replace placeholders.
    ///
    /// Called once after rendering completes. Default is a no-op.
    fn post_process(&mut self, _html: &mut String) {}

    /// Warnings generated during processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Parse a fence info string into language and attributes.
///
/// Format: `language [key=value ...]`
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let mut parts = info.split_whitespace();
    let language = parts.next().unwrap_or("").to_owned();

    let mut attrs = HashMap::new();
    for part in parts {
        if let Some((key, value)) = part.split_once('=') {
            let value = value.trim_matches('"').trim_matches('\'');
            attrs.insert(key.to_owned(), value.to_owned());
        }
    }

    (language, attrs)
}

/// Stage that passes `mermaid` fences through for client-side rendering.
///
/// The diagram source is emitted verbatim (escaped) inside
/// `<pre class="mermaid">`; the page layout ships the mermaid script that
/// renders it in the browser. Nothing is rasterized server-side.
#[derive(Default)]
pub struct MermaidProcessor;

impl CodeBlockProcessor for MermaidProcessor {
    fn process(
        &mut self,
        language: &str,
        _attrs: &HashMap<String, String>,
        source: &str,
        _index: usize,
    ) -> ProcessResult {
        if language == "mermaid" {
            ProcessResult::Inline(format!(
                r#"<pre class="mermaid">{}</pre>"#,
                escape_html(source)
            ))
        } else {
            ProcessResult::PassThrough
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fence_info_language_only() {
        let (lang, attrs) = parse_fence_info("rust");
        assert_eq!(lang, "rust");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_parse_fence_info_with_attrs() {
        let (lang, attrs) = parse_fence_info("mermaid theme=dark");
        assert_eq!(lang, "mermaid");
        assert_eq!(attrs.get("theme"), Some(&"dark".to_owned()));
    }

    #[test]
    fn test_parse_fence_info_quoted_values() {
        let (lang, attrs) = parse_fence_info("chart title='Sales'");
        assert_eq!(lang, "chart");
        assert_eq!(attrs.get("title"), Some(&"Sales".to_owned()));
    }

    #[test]
    fn test_parse_fence_info_empty() {
        let (lang, attrs) = parse_fence_info("");
        assert_eq!(lang, "");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_mermaid_processor_handles_mermaid() {
        let mut processor = MermaidProcessor;
        let result = processor.process("mermaid", &HashMap::new(), "graph TD;\nA-->B;", 0);

        assert_eq!(
            result,
            ProcessResult::Inline(
                "<pre class=\"mermaid\">graph TD;\nA--&gt;B;</pre>".to_owned()
            )
        );
    }

    #[test]
    fn test_mermaid_processor_passes_through_other_languages() {
        let mut processor = MermaidProcessor;
        let result = processor.process("rust", &HashMap::new(), "fn main() {}", 0);

        assert_eq!(result, ProcessResult::PassThrough);
    }

    #[test]
    fn test_default_trait_implementations() {
        struct MinimalProcessor;

        impl CodeBlockProcessor for MinimalProcessor {
            fn process(
                &mut self,
                _language: &str,
                _attrs: &HashMap<String, String>,
                _source: &str,
                _index: usize,
            ) -> ProcessResult {
                ProcessResult::PassThrough
            }
        }

        let processor = MinimalProcessor;
        assert!(processor.warnings().is_empty());
    }
}
