//! Authentication module providing login and access token verification.
//!
//! This module implements:
//! - Argon2id password hashing with server-side pepper
//! - HS256 JWT access tokens carrying user id, email and role
//!
//! ## Example
//!
//! ```no_run
//! use league::auth::AuthManager;
//! use league::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let auth = AuthManager::new(
//!         Arc::new(db.pool().clone()),
//!         "secret_pepper".to_string(),
//!         "jwt_secret".to_string(),
//!         24,
//!     );
//!
//!     let (user, token) = auth.login("admin@example.com", "Secret123").await?;
//!     println!("Logged in {} with token {}", user.email, token);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{AccessTokenClaims, LoginRequest, User, UserId};
