//! Markdown to XHTML conversion for the mdv markdown viewer.
//!
//! This crate provides [`Converter`], a deterministic, stateless pipeline
//! that turns raw document bytes into well-formed XHTML. The pipeline is a
//! fixed, ordered composition of syntax extensions over the base markdown
//! grammar:
//!
//! - Tables, strikethrough, task lists, definition lists (GFM-style)
//! - Footnotes with a collected section and backreferences
//! - Bare URL autolinking
//! - YAML front matter extraction (stripped from the body, surfaced to the
//!   caller)
//! - Slugified heading anchors and a table of contents
//! - Hard line breaks for single newlines
//! - Raw embedded HTML passthrough (input is trusted local content)
//! - Fenced code blocks with `language-*` classes for highlighting
//! - `mermaid` fences passed through for client-side rendering
//!
//! Code block handling is extensible via [`CodeBlockProcessor`] stages;
//! see [`Converter::with_stage`].
//!
//! # Example
//!
//! ```
//! use mdv_renderer::Converter;
//!
//! let converter = Converter::new();
//! let doc = converter.convert(b"# Hello\n\n**Bold** text").unwrap();
//! assert!(doc.html.contains("<strong>Bold</strong>"));
//! assert_eq!(doc.title.as_deref(), Some("Hello"));
//! ```

mod autolink;
mod converter;
mod front_matter;
mod processor;
mod renderer;
mod state;
mod util;

pub use converter::{Converter, RenderError, RenderedDocument};
pub use front_matter::FrontMatter;
pub use processor::{CodeBlockProcessor, MermaidProcessor, ProcessResult};
pub use state::{TocEntry, escape_html, slugify};
