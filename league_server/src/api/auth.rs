//! Authentication API handlers.
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "admin@example.com", "password": "Secret123"}'
//! ```

use axum::{Json, extract::State, http::StatusCode, response::Response};
use league::auth::{AuthError, LoginRequest, User};
use serde::Serialize;

use super::{AppState, error_response};
use crate::{logging::log_security_event, metrics};

/// Public view of the logged-in user
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        let name = match user.last_name {
            Some(last_name) if !last_name.trim().is_empty() => format!("{} {}", user.name, last_name),
            _ => user.name,
        };
        Self {
            id: user.id,
            email: user.email,
            name,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

/// Authenticate a user and issue an access token.
///
/// # Request Body
///
/// ```json
/// { "email": "admin@example.com", "password": "Secret123" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Login successful",
///   "token": "eyJhbGciOiJIUzI1NiIs...",
///   "user": { "id": 1, "email": "admin@example.com", "name": "Ana Rojas", "role": "administrador" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty email or password
/// - `401 Unauthorized`: Unknown email or wrong password
/// - `403 Forbidden`: Account disabled
/// - `500 Internal Server Error`: Database or token failure
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Response> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ));
    }

    match state
        .auth_manager
        .login(&payload.email, &payload.password)
        .await
    {
        Ok((user, token)) => {
            metrics::login_attempts_total(true);
            Ok(Json(LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                token,
                user: user.into(),
            }))
        }
        Err(e) => {
            metrics::login_attempts_total(false);
            let status = login_status(&e);
            if status.is_server_error() {
                tracing::error!("Login failed: {}", e);
            } else {
                log_security_event("failed_login", None, &e.to_string());
            }
            Err(error_response(status, e.client_message()))
        }
    }
}

fn login_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::UserNotFound | AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
        AuthError::InactiveUser => StatusCode::FORBIDDEN,
        AuthError::MissingToken | AuthError::JwtError(_) => StatusCode::UNAUTHORIZED,
        AuthError::Database(_) | AuthError::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
