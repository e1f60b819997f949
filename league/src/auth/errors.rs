//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// Password verification failed
    #[error("Invalid password")]
    InvalidPassword,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Account disabled by an administrator
    #[error("Inactive user, contact the administrator")]
    InactiveUser,

    /// Missing or malformed bearer credential
    #[error("Missing or malformed authorization header")]
    MissingToken,

    /// JWT token error
    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Unknown users and wrong passwords share one message so accounts cannot
    /// be enumerated. Database and JWT errors are sanitized.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::UserNotFound | AuthError::InvalidPassword => {
                "Invalid credentials".to_string()
            }
            AuthError::Database(_) | AuthError::HashingFailed => {
                "Internal server error".to_string()
            }
            AuthError::JwtError(_) => "Invalid or expired token".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_message() {
        assert_eq!(
            AuthError::UserNotFound.client_message(),
            AuthError::InvalidPassword.client_message()
        );
    }

    #[test]
    fn test_inactive_user_message_is_explicit() {
        assert!(AuthError::InactiveUser.client_message().contains("Inactive"));
    }
}
