//! Authentication manager implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{AccessTokenClaims, User},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    pool: Arc<PgPool>,
    pepper: String,
    jwt_secret: String,
    access_token_duration: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `pepper` - Server-side pepper for password hashing
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_hours` - Access token lifetime in hours
    ///
    /// # Returns
    ///
    /// * `AuthManager` - New authentication manager instance
    pub fn new(pool: Arc<PgPool>, pepper: String, jwt_secret: String, token_hours: i64) -> Self {
        Self {
            pool,
            pepper,
            jwt_secret,
            access_token_duration: Duration::hours(token_hours),
        }
    }

    /// Login with email and password
    ///
    /// # Arguments
    ///
    /// * `email` - Account email
    /// * `password` - Plain text password
    ///
    /// # Returns
    ///
    /// * `AuthResult<(User, String)>` - User and signed access token
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - No account with this email
    /// * `AuthError::InvalidPassword` - Incorrect password
    /// * `AuthError::InactiveUser` - Account disabled
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<(User, String)> {
        let row = sqlx::query(
            r#"
            SELECT u.id::BIGINT AS id, u.nombre, u.apellido, u.email, u.telefono,
                   u.password_hash, u.activo, u.rol_id::BIGINT AS rol_id,
                   r.nombre AS rol_nombre
            FROM usuarios u
            INNER JOIN roles r ON u.rol_id = r.id
            WHERE u.email = $1
            "#,
        )
        .bind(email.trim())
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AuthError::UserNotFound)?;

        let password_hash: String = row.try_get("password_hash")?;
        let user = User {
            id: row.try_get("id")?,
            name: row.try_get("nombre")?,
            last_name: row.try_get("apellido")?,
            email: row.try_get("email")?,
            phone: row.try_get("telefono")?,
            role_id: row.try_get("rol_id")?,
            role: row.try_get("rol_nombre")?,
            active: row.try_get("activo")?,
        };

        self.check_credentials(&user, password, &password_hash)?;
        let token = self.issue_access_token(&user)?;
        log::info!("User {} logged in", user.id);

        Ok((user, token))
    }

    /// Password first, then account state, so a disabled account is only
    /// revealed to someone who knows its password.
    fn check_credentials(&self, user: &User, password: &str, password_hash: &str) -> AuthResult<()> {
        self.verify_password(password, password_hash)?;
        if !user.active {
            return Err(AuthError::InactiveUser);
        }
        Ok(())
    }

    /// Issue a signed access token for a user
    pub fn issue_access_token(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify an access token
    ///
    /// # Arguments
    ///
    /// * `token` - JWT access token
    ///
    /// # Returns
    ///
    /// * `AuthResult<AccessTokenClaims>` - Decoded claims or error
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Hash password with Argon2id + pepper
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidPassword)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    const SECRET: &str = "test_jwt_secret_that_is_long_enough_123";

    fn manager(pepper: &str, token_hours: i64) -> AuthManager {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap();
        AuthManager::new(
            Arc::new(pool),
            pepper.to_string(),
            SECRET.to_string(),
            token_hours,
        )
    }

    fn user(active: bool) -> User {
        User {
            id: 7,
            name: "Lucia".to_string(),
            last_name: Some("Mamani".to_string()),
            email: "lucia@example.com".to_string(),
            phone: None,
            role_id: 2,
            role: "organizador".to_string(),
            active,
        }
    }

    #[tokio::test]
    async fn test_password_roundtrip_with_pepper() {
        let auth = manager("pepper_value_16chars", 24);
        let hash = auth.hash_password("Secret123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(auth.check_credentials(&user(true), "Secret123", &hash).is_ok());
        assert!(matches!(
            auth.check_credentials(&user(true), "secret123", &hash),
            Err(AuthError::InvalidPassword)
        ));

        let other_pepper = manager("another_pepper_16ch", 24);
        assert!(matches!(
            other_pepper.check_credentials(&user(true), "Secret123", &hash),
            Err(AuthError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_inactive_user_rejected_after_password_check() {
        let auth = manager("pepper_value_16chars", 24);
        let hash = auth.hash_password("Secret123").unwrap();

        assert!(matches!(
            auth.check_credentials(&user(false), "Secret123", &hash),
            Err(AuthError::InactiveUser)
        ));
        assert!(matches!(
            auth.check_credentials(&user(false), "wrong", &hash),
            Err(AuthError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let auth = manager("pepper_value_16chars", 24);
        let token = auth.issue_access_token(&user(true)).unwrap();
        let claims = auth.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "lucia@example.com");
        assert_eq!(claims.role, "organizador");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let auth = manager("pepper_value_16chars", -1);
        let token = auth.issue_access_token(&user(true)).unwrap();
        assert!(matches!(
            auth.verify_access_token(&token),
            Err(AuthError::JwtError(_))
        ));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let auth = manager("pepper_value_16chars", 24);
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap();
        let other = AuthManager::new(
            Arc::new(pool),
            "pepper_value_16chars".to_string(),
            "a_completely_different_secret_value_xyz".to_string(),
            24,
        );

        let token = other.issue_access_token(&user(true)).unwrap();
        assert!(auth.verify_access_token(&token).is_err());
        assert!(auth.verify_access_token("not.a.token").is_err());
    }
}
