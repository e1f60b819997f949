//! Report pipeline error types.

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

use super::ReportFormat;
use crate::db::StoreError;

/// Failures raised while laying out or encoding a document
#[derive(Debug, Error)]
pub enum RenderError {
    /// Layout configuration or content that cannot be placed on a page
    #[error("Layout error: {0}")]
    Layout(String),

    /// Spreadsheet encoder failure
    #[error("Workbook error: {0}")]
    Workbook(#[from] XlsxError),
}

/// Report pipeline errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Malformed request parameters
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Root entity of the report does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Unknown report kind or output format
    #[error("Unsupported report: {0}")]
    UnsupportedFormat(String),

    /// Renderer failed; no partial output is returned
    #[error("Failed to render {format} report")]
    RenderFailure {
        format: ReportFormat,
        #[source]
        source: RenderError,
    },

    /// Data store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ReportError {
    /// Get a client-safe error message
    ///
    /// Render and store failures are reduced to a generic message; their
    /// detail only goes to the logs.
    pub fn client_message(&self) -> String {
        match self {
            ReportError::RenderFailure { .. } => "Error generating report".to_string(),
            ReportError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReportError::Validation(_)
                | ReportError::NotFound { .. }
                | ReportError::UnsupportedFormat(_)
        )
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_message_names_entity() {
        let err = ReportError::NotFound {
            entity: "Tournament",
            id: 42,
        };
        assert_eq!(err.client_message(), "Tournament 42 not found");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_render_failure_is_sanitized_but_keeps_source() {
        let err = ReportError::RenderFailure {
            format: ReportFormat::Pdf,
            source: RenderError::Layout("content bottom out of range".to_string()),
        };
        assert_eq!(err.client_message(), "Error generating report");
        assert!(!err.is_client_error());
        assert!(
            err.source()
                .is_some_and(|s| s.to_string().contains("content bottom"))
        );
    }

    #[test]
    fn test_store_errors_are_sanitized() {
        let err = ReportError::from(StoreError::InvalidValue {
            column: "partidos.estado",
            value: "suspended".to_string(),
        });
        assert_eq!(err.client_message(), "Internal server error");
    }
}
