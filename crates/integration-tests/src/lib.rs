//! Integration tests for Vitrine.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no database needed)
//! cargo test -p vitrine-integration-tests
//!
//! # Database and live-server tests
//! cargo run -p vitrine-cli -- migrate
//! cargo run -p vitrine-storefront &
//! cargo test -p vitrine-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `editor_flow` - Draft sessions over the in-memory gateway
//! - `router` - The assembled router, without touching the database
//! - `postgres_gateway` - Repository and gateway queries (needs `PostgreSQL`)
//! - `storefront_api` - HTTP flows against a running storefront

use std::time::Duration;

use secrecy::SecretString;
use uuid::Uuid;

use vitrine_core::{Email, UserId};
use vitrine_storefront::config::{EditorConfig, VitrineConfig};
use vitrine_storefront::models::SessionContext;

/// Base URL of a running storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("VITRINE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database URL for the ignored `PostgreSQL` tests.
#[must_use]
pub fn database_url() -> SecretString {
    std::env::var("VITRINE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "postgres://localhost/vitrine_test".to_string())
        .into()
}

/// An email nobody else in the test run uses.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4().simple())
}

/// A logged-in user that exists only in memory.
///
/// # Panics
///
/// Never: [`unique_email`] always produces a valid address.
#[must_use]
pub fn test_context() -> SessionContext {
    SessionContext {
        user_id: UserId::generate(),
        email: Email::parse(&unique_email()).unwrap_or_else(|e| panic!("{e}")),
    }
}

/// Editor timings short enough for tests.
#[must_use]
pub const fn fast_editor_config() -> EditorConfig {
    EditorConfig {
        slug_check_delay: Duration::from_millis(10),
        idle_timeout: Duration::from_secs(60),
    }
}

/// Configuration for an in-process router.
///
/// # Panics
///
/// Never: every required variable is supplied.
#[must_use]
pub fn test_config() -> VitrineConfig {
    VitrineConfig::from_lookup(|key| match key {
        "VITRINE_DATABASE_URL" => Some("postgres://localhost/vitrine_test".to_string()),
        "VITRINE_BASE_URL" => Some("http://localhost:3000".to_string()),
        _ => None,
    })
    .unwrap_or_else(|e| panic!("{e}"))
}
