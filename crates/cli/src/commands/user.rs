//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! vitrine-cli user create -e ana@example.com -p 'a long password'
//! ```

use vitrine_storefront::services::AuthService;

use super::{CommandError, connect};

/// Create an account with the same validation as the register endpoint.
///
/// # Errors
///
/// Returns an error for an invalid email, a weak password or an email that is
/// already registered.
pub async fn create(email: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool).register(email, password).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(())
}
