//! Database operations for the Vitrine `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `vitrine.user` - Vitrine owners (email + Argon2 password hash)
//! - `vitrine.vitrine` - Public pages and their style attributes
//! - `vitrine.product` - Products, ordered by `position`
//! - `vitrine.vitrine_analytics` - Public page visit counters
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p vitrine-cli -- migrate
//! ```

pub mod analytics;
pub mod gateway;
pub mod products;
pub mod users;
pub mod vitrines;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use vitrine_core::GatewayError;

pub use analytics::AnalyticsRepository;
pub use gateway::PgGateway;
pub use products::ProductRepository;
pub use users::UserRepository;
pub use vitrines::VitrineRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to [`RepositoryError::Conflict`], anything else to
    /// [`RepositoryError::Database`].
    pub(crate) fn from_write(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

impl From<RepositoryError> for GatewayError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::Database(e) => Self::Backend(e.to_string()),
            RepositoryError::DataCorruption(msg) => Self::Backend(msg),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Trim optional text; blank becomes `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_maps_to_gateway_error() {
        assert_eq!(
            GatewayError::from(RepositoryError::NotFound),
            GatewayError::NotFound
        );
        assert_eq!(
            GatewayError::from(RepositoryError::Conflict("slug taken".to_string())),
            GatewayError::Conflict("slug taken".to_string())
        );
        assert!(matches!(
            GatewayError::from(RepositoryError::DataCorruption("bad".to_string())),
            GatewayError::Backend(_)
        ));
        assert!(matches!(
            GatewayError::from(RepositoryError::Database(sqlx::Error::RowNotFound)),
            GatewayError::Backend(_)
        ));
    }

    #[test]
    fn test_from_write_keeps_non_unique_errors() {
        assert!(matches!(
            RepositoryError::from_write(sqlx::Error::PoolTimedOut, "taken"),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" a ")), Some("a"));
        assert_eq!(non_blank(None), None);
    }
}
