//! The fixed conversion pipeline.
//!
//! [`Converter`] owns the pipeline configuration: parser options, the
//! ordered list of code block stages, and the autolink pattern. Each
//! [`convert`](Converter::convert) call builds a fresh event renderer, so
//! conversion is a pure function of its input: identical bytes always
//! produce identical output, and a shared `Converter` is safe to call from
//! concurrent requests.

use pulldown_cmark::{Options, Parser};
use regex::Regex;

use crate::autolink::URL_PATTERN;
use crate::front_matter::FrontMatter;
use crate::processor::{CodeBlockProcessor, MermaidProcessor};
use crate::renderer::HtmlRenderer;
use crate::state::TocEntry;

/// Factory for a per-conversion processor stage.
type StageFactory = Box<dyn Fn() -> Box<dyn CodeBlockProcessor> + Send + Sync>;

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Rendered XHTML body, with front matter stripped.
    pub html: String,
    /// Parsed front matter, if the document had a valid leading block.
    pub front_matter: Option<FrontMatter>,
    /// Document title: front matter `title`, else the first H1.
    pub title: Option<String>,
    /// Table of contents entries (one per heading anchor).
    pub toc: Vec<TocEntry>,
    /// Non-fatal problems encountered during conversion.
    pub warnings: Vec<String>,
}

/// Conversion error.
///
/// Conversion fails only when the pipeline cannot produce output at all;
/// malformed markup degrades per the parser's recovery rules instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The document bytes are not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Markdown to XHTML converter with a fixed extension pipeline.
///
/// The default pipeline enables tables, strikethrough, task lists,
/// definition lists, footnotes, YAML front matter, bare URL autolinking,
/// heading anchors, hard line breaks, raw HTML passthrough, and a mermaid
/// pass-through stage. Additional stages can be appended with
/// [`with_stage`](Self::with_stage).
pub struct Converter {
    options: Options,
    hard_breaks: bool,
    autolink: Regex,
    stages: Vec<StageFactory>,
}

impl Converter {
    /// Create a converter with the default pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_DEFINITION_LIST
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS,
            hard_breaks: true,
            autolink: Regex::new(URL_PATTERN).expect("autolink pattern is a compile-time constant"),
            stages: vec![Box::new(|| Box::new(MermaidProcessor))],
        }
    }

    /// Enable or disable hard line breaks (single newlines become `<br />`).
    ///
    /// Enabled by default.
    #[must_use]
    pub fn with_hard_breaks(mut self, enabled: bool) -> Self {
        self.hard_breaks = enabled;
        self
    }

    /// Append a code block stage to the pipeline.
    ///
    /// The factory is invoked once per conversion so stages may keep
    /// per-document state. Stages are checked in registration order.
    #[must_use]
    pub fn with_stage(
        mut self,
        factory: impl Fn() -> Box<dyn CodeBlockProcessor> + Send + Sync + 'static,
    ) -> Self {
        self.stages.push(Box::new(factory));
        self
    }

    /// The parser options of the configured pipeline.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        self.options
    }

    /// Convert raw document bytes into a rendered document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encoding`] when the bytes are not valid
    /// UTF-8. Malformed markup never fails; a malformed front matter block
    /// is dropped with a warning while the body still renders.
    pub fn convert(&self, source: &[u8]) -> Result<RenderedDocument, RenderError> {
        let text = std::str::from_utf8(source)?;

        let processors = self.stages.iter().map(|f| f()).collect();
        let renderer = HtmlRenderer::new(&self.autolink, self.hard_breaks, processors);
        let parser = Parser::new_ext(text, self.options);
        let output = renderer.render(parser);

        let mut warnings = output.warnings;
        let front_matter = output.front_matter_raw.and_then(|raw| {
            FrontMatter::parse(&raw)
                .map_err(|e| warnings.push(format!("invalid front matter: {e}")))
                .ok()
        });

        let title = front_matter
            .as_ref()
            .and_then(|fm| fm.title().map(ToOwned::to_owned))
            .or(output.title);

        Ok(RenderedDocument {
            html: output.html,
            front_matter,
            title,
            toc: output.toc,
            warnings,
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
