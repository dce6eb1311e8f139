//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::layout;

/// Server error type.
///
/// Not-found outcomes surface to the client; everything else becomes a
/// generic server error page, with the detail kept in the logs so internal
/// paths never leak into responses.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No document matched the requested reference.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Storage failure (walk or read).
    #[error("storage error: {0}")]
    Store(#[from] mdv_storage::StoreError),

    /// Conversion failure.
    #[error("render error: {0}")]
    Render(#[from] mdv_renderer::RenderError),
}

impl ServerError {
    /// Classify a store error against the reference that triggered it.
    pub(crate) fn from_store(err: mdv_storage::StoreError, reference: &str) -> Self {
        if err.is_not_found() {
            Self::NotFound(reference.to_owned())
        } else {
            Self::Store(err)
        }
    }

    /// HTTP status for this error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound(reference) => {
                layout::error_page("Not Found", &format!("No document matches \"{reference}\"."))
            }
            Self::Store(err) => {
                tracing::error!(error = %err, "storage failure");
                layout::error_page("Server Error", "The document could not be loaded.")
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "conversion failure");
                layout::error_page("Server Error", "The document could not be rendered.")
            }
        };

        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use mdv_storage::{StoreError, StoreErrorKind};

    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = ServerError::NotFound("notes".to_owned());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_error_status() {
        let err = ServerError::Store(StoreError::new(StoreErrorKind::Traversal));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ServerError::Store(StoreError::new(StoreErrorKind::Read));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_store_maps_not_found() {
        let err = ServerError::from_store(StoreError::not_found("notes"), "notes");
        assert!(matches!(err, ServerError::NotFound(ref r) if r == "notes"));

        let err = ServerError::from_store(
            StoreError::new(StoreErrorKind::InvalidPath).with_path("../x"),
            "../x",
        );
        assert!(matches!(err, ServerError::NotFound(_)));

        let err = ServerError::from_store(StoreError::new(StoreErrorKind::Traversal), "notes");
        assert!(matches!(err, ServerError::Store(_)));
    }
}
