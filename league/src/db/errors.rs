//! Store error types.

use std::time::Duration;

use thiserror::Error;

/// Failures raised while reading report data from the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query did not complete in time
    #[error("Store query timed out after {0:?}")]
    Timeout(Duration),

    /// A column held a value the model cannot represent
    #[error("Invalid value {value:?} in column {column}")]
    InvalidValue { column: &'static str, value: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_names_column() {
        let err = StoreError::InvalidValue {
            column: "partidos.estado",
            value: "suspendido".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("partidos.estado"));
        assert!(msg.contains("suspendido"));
    }

    #[test]
    fn test_timeout_display() {
        let err = StoreError::Timeout(Duration::from_secs(5));
        assert!(err.to_string().contains("5s"));
    }
}
