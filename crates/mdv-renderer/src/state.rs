//! Shared state structs for markdown rendering.
//!
//! These structs track context during event processing: code block and
//! table buffers, heading capture for anchors and the table of contents,
//! footnote collection, and front matter capture.

use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Language of current code block (e.g., "rust", "python").
    language: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// State for tracking heading anchors and title extraction.
///
/// Every heading gets a slugified, de-duplicated `id`; the first H1's text
/// doubles as the document title (the heading itself is still rendered).
pub(crate) struct HeadingState {
    /// Extracted title from the first H1.
    title: Option<String>,
    /// Current heading level being processed (None if not in a heading).
    current_level: Option<u8>,
    /// Buffer for heading plain text (for the ToC and slug).
    text: String,
    /// Buffer for heading HTML (with inline formatting).
    html: String,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub fn new() -> Self {
        Self {
            title: None,
            current_level: None,
            text: String::new(),
            html: String::new(),
            toc: Vec::new(),
            id_counts: HashMap::new(),
        }
    }

    /// Check if we're currently inside a heading.
    pub fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    /// Start tracking a heading.
    pub fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    /// Complete the heading and generate its table of contents entry.
    /// Returns (level, id, html) or None if not in a heading.
    pub fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);

        let id = self.generate_id(&text);

        // First H1 doubles as the document title but is still rendered
        // and still appears in the ToC.
        if level == 1 && self.title.is_none() {
            self.title = Some(text.trim().to_owned());
        }

        self.toc.push(TocEntry {
            level,
            title: text.trim().to_owned(),
            id: id.clone(),
        });

        Some((level, id, html))
    }

    /// Generate a unique ID for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// State for collecting footnote references and definitions.
///
/// References are numbered in order of first appearance; definitions are
/// buffered during rendering and emitted as a single section at the end of
/// the document, ordered by reference number.
#[derive(Default)]
pub(crate) struct FootnoteState {
    /// Label → reference number, assigned at first reference.
    numbers: HashMap<String, usize>,
    /// Labels in reference-number order.
    order: Vec<String>,
    /// Label → rendered definition HTML.
    definitions: HashMap<String, String>,
    /// Label of the definition currently being captured.
    active: Option<String>,
    /// Holding area for the main output while a definition is captured.
    buffer: String,
}

impl FootnoteState {
    /// Number for a label, assigning the next one on first use.
    ///
    /// Returns `(number, first)` where `first` reports whether this was the
    /// label's first reference (the anchor id is only emitted once).
    pub fn reference(&mut self, label: &str) -> (usize, bool) {
        if let Some(&n) = self.numbers.get(label) {
            return (n, false);
        }
        let n = self.order.len() + 1;
        self.numbers.insert(label.to_owned(), n);
        self.order.push(label.to_owned());
        (n, true)
    }

    /// Begin capturing a definition: the main output is parked in `buffer`
    /// and definition events render into a fresh output.
    pub fn start_definition(&mut self, label: &str, output: &mut String) {
        self.active = Some(label.to_owned());
        self.buffer = std::mem::take(output);
    }

    /// Finish capturing: store the definition HTML and restore the main output.
    pub fn end_definition(&mut self, output: &mut String) {
        let html = std::mem::replace(output, std::mem::take(&mut self.buffer));
        if let Some(label) = self.active.take() {
            self.definitions.insert(label, html);
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_references(&self) -> bool {
        !self.order.is_empty()
    }

    /// Referenced labels in number order, paired with their definition HTML
    /// (empty when a reference has no matching definition).
    pub fn take_ordered(&mut self) -> Vec<(String, String)> {
        let order = std::mem::take(&mut self.order);
        let mut definitions = std::mem::take(&mut self.definitions);
        order
            .into_iter()
            .map(|label| {
                let html = definitions.remove(&label).unwrap_or_default();
                (label, html)
            })
            .collect()
    }
}

/// State for capturing a leading metadata block.
#[derive(Default)]
pub(crate) struct MetadataState {
    active: bool,
    buffer: String,
}

impl MetadataState {
    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Take the captured raw YAML (empty if no block was seen).
    pub fn take_raw(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

/// Convert text to a URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single
/// dashes, and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("rust".to_owned()));
        assert!(state.is_active());

        state.push_str("fn main() {}");
        let (lang, content) = state.end();
        assert_eq!(lang, Some("rust".to_owned()));
        assert_eq!(content, "fn main() {}");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::Center, Alignment::Right]);

        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:left""#
        );

        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:center""#
        );

        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:right""#
        );

        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_heading_state() {
        let mut state = HeadingState::new();

        state.start_heading(1);
        state.push_text("My Title");
        let (level, id, _html) = state.complete_heading().unwrap();
        assert_eq!(level, 1);
        assert_eq!(id, "my-title");

        state.start_heading(2);
        state.push_text("Section");
        let (level, id, _html) = state.complete_heading().unwrap();
        assert_eq!(level, 2);
        assert_eq!(id, "section");

        assert_eq!(state.take_title(), Some("My Title".to_owned()));
        // Title H1 appears in the ToC alongside later headings
        assert_eq!(state.take_toc().len(), 2);
    }

    #[test]
    fn test_heading_id_dedup() {
        let mut state = HeadingState::new();
        for _ in 0..3 {
            state.start_heading(2);
            state.push_text("FAQ");
            let _ = state.complete_heading();
        }

        let toc = state.take_toc();
        assert_eq!(toc[0].id, "faq");
        assert_eq!(toc[1].id, "faq-1");
        assert_eq!(toc[2].id, "faq-2");
    }

    #[test]
    fn test_footnote_numbering() {
        let mut state = FootnoteState::default();
        assert_eq!(state.reference("a"), (1, true));
        assert_eq!(state.reference("b"), (2, true));
        assert_eq!(state.reference("a"), (1, false));
        assert!(state.has_references());
    }

    #[test]
    fn test_footnote_definition_capture() {
        let mut state = FootnoteState::default();
        state.reference("note");

        let mut output = String::from("<p>body</p>");
        state.start_definition("note", &mut output);
        assert!(state.is_capturing());
        assert_eq!(output, "");

        output.push_str("<p>definition</p>");
        state.end_definition(&mut output);
        assert!(!state.is_capturing());
        assert_eq!(output, "<p>body</p>");

        let ordered = state.take_ordered();
        assert_eq!(
            ordered,
            vec![("note".to_owned(), "<p>definition</p>".to_owned())]
        );
    }

    #[test]
    fn test_footnote_reference_without_definition() {
        let mut state = FootnoteState::default();
        state.reference("dangling");

        let ordered = state.take_ordered();
        assert_eq!(ordered, vec![("dangling".to_owned(), String::new())]);
    }

    #[test]
    fn test_metadata_capture() {
        let mut state = MetadataState::default();
        assert!(!state.is_active());

        state.start();
        state.push_str("title: Test\n");
        state.end();

        assert_eq!(state.take_raw(), "title: Test\n");
    }
}
