//! Database configuration module.
//!
//! Connection pool settings for the PostgreSQL store backing the reports.

use std::env;
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Upper bound for a single report query in seconds
    pub query_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 2)
    /// - `DB_CONNECTION_TIMEOUT_SECS`: Acquire timeout (default: 5)
    /// - `DB_IDLE_TIMEOUT_SECS`: Idle timeout (default: 300)
    /// - `DB_MAX_LIFETIME_SECS`: Max lifetime (default: 1800)
    /// - `DB_QUERY_TIMEOUT_SECS`: Per-query timeout (default: 10)
    ///
    /// Unparseable numeric values fall back to their defaults.
    ///
    /// # Returns
    ///
    /// * `None` if `DATABASE_URL` is not set
    pub fn from_env() -> Option<Self> {
        let database_url = env::var("DATABASE_URL").ok()?;
        Some(Self::with_url(database_url))
    }

    /// Pool defaults, overridable through the `DB_*` variables
    pub fn with_url(database_url: String) -> Self {
        Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connection_timeout_secs: env_or("DB_CONNECTION_TIMEOUT_SECS", 5),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
            query_timeout_secs: env_or("DB_QUERY_TIMEOUT_SECS", 10),
        }
    }

    /// Local development database
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/torneos".to_string(),
            max_connections: 20,
            min_connections: 2,
            connection_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
            query_timeout_secs: 10,
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.query_timeout(), Duration::from_secs(10));
        assert!(config.database_url.starts_with("postgres://"));
    }
}
