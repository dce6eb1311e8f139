//! Event-loop renderer producing XHTML.
//!
//! Walks pulldown-cmark events and writes well-formed markup: void elements
//! self-close, raw embedded HTML passes through unescaped, single newlines
//! become line breaks, headings carry slugified anchors.

use std::collections::HashMap;
use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};
use regex::Regex;

use crate::autolink::autolink_into;
use crate::processor::{CodeBlockProcessor, ProcessResult, parse_fence_info};
use crate::state::{
    CodeBlockState, FootnoteState, HeadingState, ImageState, MetadataState, TableState, TocEntry,
    escape_html, slugify,
};
use crate::util::heading_level_to_num;

/// Raw output of one render pass, before front matter parsing.
pub(crate) struct RenderOutput {
    /// Rendered XHTML body.
    pub html: String,
    /// Title from the first H1 heading.
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Raw YAML captured from a leading metadata block.
    pub front_matter_raw: Option<String>,
    /// Warnings from processor stages.
    pub warnings: Vec<String>,
}

/// One-shot event renderer.
///
/// Created fresh per conversion; all state lives in the instance, so a
/// [`Converter`](crate::Converter) sharing one across threads never happens.
pub(crate) struct HtmlRenderer<'a> {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    footnote: FootnoteState,
    metadata: MetadataState,
    pending_image: Option<(String, String)>,
    pending_attrs: HashMap<String, String>,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    code_block_index: usize,
    /// Nesting depth of explicit links; autolinking is off inside them.
    link_depth: usize,
    autolink: &'a Regex,
    hard_breaks: bool,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(
        autolink: &'a Regex,
        hard_breaks: bool,
        processors: Vec<Box<dyn CodeBlockProcessor>>,
    ) -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(),
            footnote: FootnoteState::default(),
            metadata: MetadataState::default(),
            pending_image: None,
            pending_attrs: HashMap::new(),
            processors,
            code_block_index: 0,
            link_depth: 0,
            autolink,
            hard_breaks,
        }
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Render markdown events and return the result.
    pub fn render<'e, I>(mut self, events: I) -> RenderOutput
    where
        I: Iterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event);
        }

        self.append_footnote_section();

        let mut html = std::mem::take(&mut self.output);
        for processor in &mut self.processors {
            processor.post_process(&mut html);
        }

        let raw = self.metadata.take_raw();

        RenderOutput {
            html,
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
            front_matter_raw: (!raw.is_empty()).then_some(raw),
            warnings: self
                .processors
                .iter()
                .flat_map(|p| p.warnings())
                .cloned()
                .collect(),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.push_inline("<hr />"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the ID is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => {
                self.output.push_str("<blockquote>");
            }
            Tag::CodeBlock(kind) => {
                let (lang, attrs) = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        let (lang, attrs) = parse_fence_info(info);
                        (if lang.is_empty() { None } else { Some(lang) }, attrs)
                    }
                    _ => (None, HashMap::new()),
                };
                self.pending_attrs = attrs;
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => {
                self.output.push_str("<li>");
            }
            Tag::FootnoteDefinition(label) => {
                self.footnote.start_definition(&label, &mut self.output);
            }
            Tag::HtmlBlock => {}
            Tag::MetadataBlock(_) => {
                self.metadata.start();
            }
            Tag::DefinitionList => {
                self.output.push_str("<dl>");
            }
            Tag::DefinitionListTitle => {
                self.output.push_str("<dt>");
            }
            Tag::DefinitionListDefinition => {
                self.output.push_str("<dd>");
            }
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                self.link_depth += 1;
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&dest_url));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Collect alt text; the image is written in end_tag.
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.output.push_str("</blockquote>");
            }
            TagEnd::CodeBlock => self.end_code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition => {
                self.footnote.end_definition(&mut self.output);
            }
            TagEnd::HtmlBlock => {}
            TagEnd::MetadataBlock(_) => {
                self.metadata.end();
            }
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    let img = format!(
                        r#"<img src="{}"{title_attr} alt="{}" />"#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    self.push_inline(&img);
                }
            }
            TagEnd::DefinitionList => {
                self.output.push_str("</dl>");
            }
            TagEnd::DefinitionListTitle => {
                self.output.push_str("</dt>");
            }
            TagEnd::DefinitionListDefinition => {
                self.output.push_str("</dd>");
            }
            TagEnd::Table => {
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => {
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.push_inline("</a>");
            }
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    /// Dispatch a finished code block to processor stages, falling back to a
    /// language-classed `<pre><code>` block.
    fn end_code_block(&mut self) {
        let (lang, content) = self.code.end();
        let attrs = std::mem::take(&mut self.pending_attrs);
        let index = self.code_block_index;
        self.code_block_index += 1;

        let processed = lang.as_ref().is_some_and(|lang_str| {
            self.processors.iter_mut().any(|processor| {
                match processor.process(lang_str, &attrs, &content, index) {
                    ProcessResult::Placeholder(placeholder) => {
                        self.output.push_str(&placeholder);
                        true
                    }
                    ProcessResult::Inline(html) => {
                        self.output.push_str(&html);
                        true
                    }
                    ProcessResult::PassThrough => false,
                }
            })
        });

        if !processed {
            if let Some(lang) = lang.as_deref() {
                write!(
                    self.output,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(&content)
                )
                .unwrap();
            } else {
                write!(
                    self.output,
                    "<pre><code>{}</code></pre>",
                    escape_html(&content)
                )
                .unwrap();
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.metadata.is_active() {
            self.metadata.push_str(text);
        } else if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else if self.link_depth == 0 {
            autolink_into(self.autolink, text, &mut self.output);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    /// Literal embedded markup passes through unescaped: documents come from
    /// a trusted local filesystem, not from untrusted network input.
    fn raw_html(&mut self, html: &str) {
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if self.metadata.is_active() {
            self.metadata.push_str("\n");
        } else if self.code.is_active() {
            self.code.push_newline();
        } else if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html(" ");
        } else if self.hard_breaks {
            // Single newlines within a paragraph become line breaks.
            self.output.push_str("<br />\n");
        } else {
            self.output.push('\n');
        }
    }

    fn hard_break(&mut self) {
        if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html(" ");
        } else {
            self.output.push_str("<br />\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.output
                .push_str(r#"<input type="checkbox" checked="checked" disabled="disabled" /> "#);
        } else {
            self.output
                .push_str(r#"<input type="checkbox" disabled="disabled" /> "#);
        }
    }

    fn footnote_reference(&mut self, label: &str) {
        let (n, first) = self.footnote.reference(label);
        let id = footnote_id(label, n);
        let sup = if first {
            format!(r##"<sup class="footnote-ref" id="fnref-{id}"><a href="#fn-{id}">{n}</a></sup>"##)
        } else {
            format!(r##"<sup class="footnote-ref"><a href="#fn-{id}">{n}</a></sup>"##)
        };
        self.push_inline(&sup);
    }

    /// Emit the collected footnote definitions as an ordered section.
    fn append_footnote_section(&mut self) {
        if !self.footnote.has_references() {
            return;
        }

        self.output
            .push_str(r#"<section class="footnotes"><hr /><ol>"#);
        for (n, (label, html)) in self.footnote.take_ordered().into_iter().enumerate() {
            let id = footnote_id(&label, n + 1);
            let backref =
                format!(r##" <a href="#fnref-{id}" class="footnote-backref">&#8617;</a>"##);
            write!(self.output, r#"<li id="fn-{id}">"#).unwrap();
            // The backref belongs inside the definition's last paragraph.
            if let Some(body) = html.strip_suffix("</p>") {
                self.output.push_str(body);
                self.output.push_str(&backref);
                self.output.push_str("</p>");
            } else {
                self.output.push_str(&html);
                self.output.push_str(&backref);
            }
            self.output.push_str("</li>");
        }
        self.output.push_str("</ol></section>");
    }
}

/// Anchor id for a footnote label, falling back to its number when the
/// label slugs to nothing.
fn footnote_id(label: &str, n: usize) -> String {
    let slug = slugify(label);
    if slug.is_empty() { n.to_string() } else { slug }
}
