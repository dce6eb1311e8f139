//! Document pages: resolve a reference, read the file, convert, wrap.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;

use crate::error::ServerError;
use crate::layout;
use crate::state::AppState;

/// Handle GET /{*path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let content = state
        .store
        .read(&path)
        .map_err(|e| ServerError::from_store(e, &path))?;

    let doc = state.converter.convert(content.as_bytes())?;

    if state.verbose {
        for warning in &doc.warnings {
            tracing::warn!(path = %path, warning = %warning, "render warning");
        }
    }

    let title = doc.title.as_deref().unwrap_or(&path);

    Ok(Html(layout::page(title, &doc.html, &state.version)))
}
