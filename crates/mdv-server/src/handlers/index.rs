//! Index page: a sorted listing of every document under the root.

use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use mdv_renderer::escape_html;

use crate::error::ServerError;
use crate::layout;
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    // Walk order is unspecified, so the index sorts for a stable display.
    let mut paths = state.store.list()?;
    paths.sort();

    let mut body = String::from("<h1>Documents</h1>\n");
    if paths.is_empty() {
        body.push_str("<p>No markdown files found.</p>");
    } else {
        body.push_str("<ul>\n");
        for path in &paths {
            writeln!(
                body,
                r#"<li><a href="/{}">{}</a></li>"#,
                escape_html(path),
                escape_html(path)
            )
            .unwrap();
        }
        body.push_str("</ul>");
    }

    Ok(Html(layout::page("Documents", &body, &state.version)))
}
