//! Application state.
//!
//! Shared state for all request handlers. Both components are immutable
//! after construction, so requests share them without locks.

use mdv_renderer::Converter;
use mdv_storage::DocStore;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document store for resolution and reads.
    pub(crate) store: DocStore,
    /// Markdown to XHTML converter.
    pub(crate) converter: Converter,
    /// Enable verbose output (log render warnings).
    pub(crate) verbose: bool,
    /// Application version (shown in the page footer).
    pub(crate) version: String,
}
