//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use thiserror::Error;

use vitrine_storefront::services::AuthError;

/// Errors shared by the subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Gateway(#[from] vitrine_core::GatewayError),

    #[error(transparent)]
    Validation(#[from] vitrine_core::ValidationError),

    #[error("Invalid slug: {0}")]
    Slug(#[from] vitrine_core::SlugError),
}

/// Database URL the storefront uses, with the same fallback.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("VITRINE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("VITRINE_DATABASE_URL"))
}

async fn connect() -> Result<sqlx::PgPool, CommandError> {
    let database_url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(vitrine_storefront::db::create_pool(&database_url).await?)
}
