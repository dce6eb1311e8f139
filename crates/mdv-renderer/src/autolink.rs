//! Bare URL autolinking.
//!
//! Text events outside links and code are scanned for bare `http://`,
//! `https://`, and `www.` URLs, which become anchors without explicit link
//! syntax. Trailing sentence punctuation is left outside the link.

use std::fmt::Write;

use regex::Regex;

use crate::state::escape_html;

/// Pattern for bare URLs in plain text.
pub(crate) const URL_PATTERN: &str = r#"(?:https?://|www\.)[^\s<>"]+"#;

/// Escape `text` into `out`, turning bare URLs into anchors.
pub(crate) fn autolink_into(re: &Regex, text: &str, out: &mut String) {
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));

        let (url, trailing) = split_trailing_punctuation(m.as_str());
        let href = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url)
        )
        .unwrap();
        out.push_str(&escape_html(trailing));

        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
}

/// Split trailing punctuation off a matched URL.
///
/// Sentence punctuation directly after a URL belongs to the prose, not the
/// link; a closing paren only counts when it is unbalanced within the match.
fn split_trailing_punctuation(url: &str) -> (&str, &str) {
    let mut end = url.len();
    loop {
        let trimmed = &url[..end];
        let Some(last) = trimmed.chars().last() else {
            break;
        };
        let cut = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' => true,
            ')' => trimmed.matches('(').count() < trimmed.matches(')').count(),
            _ => false,
        };
        if cut {
            end -= last.len_utf8();
        } else {
            break;
        }
    }
    (&url[..end], &url[end..])
}
