//! Store error type.
//!
//! Provides [`StoreError`] with semantic kinds so callers can distinguish
//! a missing document (client-visible) from a failed walk or read
//! (server-side failure).

use std::path::PathBuf;

/// Semantic error categories for store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// No document under the root matched the reference.
    NotFound,
    /// The directory subtree could not be walked.
    Traversal,
    /// A resolved file could not be read.
    Read,
    /// The reference contains path traversal segments.
    InvalidPath,
}

/// Store error with semantic kind and optional path/reference context.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Path or reference context (if applicable).
    pub path: Option<PathBuf>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            path: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error carrying the original reference.
    #[must_use]
    pub fn not_found(reference: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_path(reference)
    }

    /// Create a traversal error from an I/O error during the walk.
    #[must_use]
    pub fn traversal(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::Traversal)
            .with_path(path)
            .with_source(err)
    }

    /// Create a read error for a file that resolved but could not be read.
    #[must_use]
    pub fn read(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::Read)
            .with_path(path)
            .with_source(err)
    }

    /// Whether this error maps to a client-visible "not found" outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::NotFound | StoreErrorKind::InvalidPath
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "document not found",
            StoreErrorKind::Traversal => "directory walk failed",
            StoreErrorKind::Read => "read failed",
            StoreErrorKind::InvalidPath => "invalid reference",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_store_error_new() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert!(err.path.is_none());
    }

    #[test]
    fn test_not_found_carries_reference() {
        let err = StoreError::not_found("guides/setup");

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("guides/setup")));
    }

    #[test]
    fn test_display_simple() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.to_string(), "document not found");
    }

    #[test]
    fn test_display_with_path() {
        let err = StoreError::not_found("notes");

        assert_eq!(err.to_string(), "document not found (path: notes)");
    }

    #[test]
    fn test_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::traversal(io_err, "/srv/docs");

        assert_eq!(
            err.to_string(),
            "directory walk failed: denied (path: /srv/docs)"
        );
    }

    #[test]
    fn test_source_preserved() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StoreError::read(io_err, "notes.md");

        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::new(StoreErrorKind::NotFound).is_not_found());
        assert!(StoreError::new(StoreErrorKind::InvalidPath).is_not_found());
        assert!(!StoreError::new(StoreErrorKind::Traversal).is_not_found());
        assert!(!StoreError::new(StoreErrorKind::Read).is_not_found());
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }
}
