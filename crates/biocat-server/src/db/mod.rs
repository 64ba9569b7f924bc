//! Postgres connection pool and schema migrations

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::{
    DatabaseConfig, DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS, DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_MIN_CONNECTIONS, DEFAULT_DATABASE_URL,
};

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Database configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),

    /// Schema migration failed
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: Option<u64>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            idle_timeout_secs: Some(DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
        }
    }
}

impl From<&DatabaseConfig> for DbConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: Some(config.idle_timeout_secs),
        }
    }
}

impl DbConfig {
    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DbError::config("DATABASE_URL not set"))?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);

        let min_connections = std::env::var("DATABASE_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS);

        let connect_timeout_secs = std::env::var("DATABASE_CONNECT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS);

        let idle_timeout_secs = std::env::var("DATABASE_IDLE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok());

        Ok(Self {
            url,
            max_connections,
            min_connections,
            connect_timeout_secs,
            idle_timeout_secs,
        })
    }
}

pub async fn create_pool(config: &DbConfig) -> DbResult<PgPool> {
    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    if let Some(idle_timeout) = config.idle_timeout_secs {
        options = options.idle_timeout(Duration::from_secs(idle_timeout));
    }

    let pool = options.connect(&config.url).await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Apply the schema in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, DEFAULT_DATABASE_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_DATABASE_MIN_CONNECTIONS);
        assert_eq!(config.idle_timeout_secs, Some(DEFAULT_DATABASE_IDLE_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_from_database_section() {
        let section = DatabaseConfig {
            url: "postgresql://localhost/test".to_string(),
            max_connections: 15,
            min_connections: 1,
            connect_timeout_secs: 3,
            idle_timeout_secs: 60,
        };

        let config = DbConfig::from(&section);
        assert_eq!(config.max_connections, 15);
        assert_eq!(config.idle_timeout_secs, Some(60));
        assert!(config.url.contains("localhost/test"));
    }
}
