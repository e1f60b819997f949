//! Authentication data models.

use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// Authenticated user, as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role_id: i64,
    pub role: String,
    #[serde(skip_serializing)]
    pub active: bool,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// JWT claims for access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: UserId,           // User ID
    pub email: String,
    pub role: String,
    pub exp: i64,              // Expiration timestamp
    pub iat: i64,              // Issued at timestamp
}
