//! HTML page layout.
//!
//! Wraps rendered document bodies in a minimal page shell. The shell ships
//! the fixed highlight theme for code blocks and the mermaid script that
//! renders diagram blocks client-side. The document body is embedded
//! unescaped: it is trusted output of the converter over trusted local
//! files.

use std::fmt::Write;

use mdv_renderer::escape_html;

/// Fixed page stylesheet.
const STYLE: &str = "\
body{max-width:48rem;margin:0 auto;padding:2rem 1rem;\
font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Helvetica,Arial,sans-serif;\
line-height:1.6;color:#1f2328}\
h1,h2,h3,h4,h5,h6{margin-top:1.5em;line-height:1.25}\
a{color:#0969da;text-decoration:none}\
a:hover{text-decoration:underline}\
pre{background:#f6f8fa;padding:1rem;overflow-x:auto;border-radius:6px}\
code{font-family:ui-monospace,SFMono-Regular,Menlo,Consolas,monospace;font-size:.9em}\
p code{background:#f6f8fa;padding:.15em .3em;border-radius:4px}\
table{border-collapse:collapse;margin:1em 0}\
th,td{border:1px solid #d1d9e0;padding:.4em .8em}\
thead{background:#f6f8fa}\
blockquote{border-left:4px solid #d1d9e0;margin-left:0;padding-left:1rem;color:#59636e}\
dt{font-weight:600}\
section.footnotes{margin-top:2rem;font-size:.9em;color:#59636e}\
footer{margin-top:3rem;font-size:.8em;color:#59636e}";

/// Fixed highlight theme (github style) and highlighting script.
const HIGHLIGHT: &str = concat!(
    r#"<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/styles/github.min.css" />"#,
    "\n",
    r#"<script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/highlight.min.js"></script>"#,
    "\n",
    "<script>hljs.highlightAll();</script>"
);

/// Client-side diagram rendering.
const MERMAID: &str = r#"<script type="module">import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";mermaid.initialize({startOnLoad:true});</script>"#;

/// Wrap a rendered document body in the page shell.
pub(crate) fn page(title: &str, body: &str, version: &str) -> String {
    let mut out = String::with_capacity(body.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    writeln!(out, "<title>{}</title>", escape_html(title)).unwrap();
    writeln!(out, "<style>{STYLE}</style>").unwrap();
    out.push_str(HIGHLIGHT);
    out.push('\n');
    out.push_str(MERMAID);
    out.push_str("\n</head>\n<body>\n<main>\n");
    out.push_str(body);
    out.push_str("\n</main>\n");
    if version.is_empty() {
        out.push_str("<footer><a href=\"/\">Index</a></footer>\n");
    } else {
        writeln!(
            out,
            "<footer><a href=\"/\">Index</a> &middot; mdv {}</footer>",
            escape_html(version)
        )
        .unwrap();
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Build an error page with an escaped message.
pub(crate) fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1><p>{}</p>",
        escape_html(title),
        escape_html(message)
    );
    page(title, &body, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_body_unescaped() {
        let html = page("Guide", "<p>rendered <strong>body</strong></p>", "1.0.0");

        assert!(html.contains("<p>rendered <strong>body</strong></p>"));
        assert!(html.contains("<title>Guide</title>"));
        assert!(html.contains("mdv 1.0.0"));
    }

    #[test]
    fn test_page_escapes_title() {
        let html = page("<script>", "body", "");

        assert!(html.contains("<title>&lt;script&gt;</title>"));
        assert!(!html.contains("<title><script>"));
    }

    #[test]
    fn test_page_ships_fixed_theme_and_mermaid() {
        let html = page("t", "b", "");

        assert!(html.contains("github.min.css"));
        assert!(html.contains("hljs.highlightAll()"));
        assert!(html.contains("mermaid.initialize"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page("Not Found", "No document matches \"<x>\".");

        assert!(html.contains("&lt;x&gt;"));
        assert!(!html.contains("<x>"));
    }
}
