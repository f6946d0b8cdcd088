//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VITRINE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `VITRINE_BASE_URL` - Public origin; vitrines are served at `<base>/v/<slug>`
//!
//! ## Optional
//! - `VITRINE_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_PORT` - Listen port (default: 3000)
//! - `VITRINE_SLUG_CHECK_DELAY_MS` - Slug availability settling delay (default: 800)
//! - `VITRINE_EDITOR_IDLE_SECS` - Idle time before a draft session is closed (default: 1800)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct VitrineConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public origin, without a trailing slash
    pub base_url: String,
    /// Draft session tuning
    pub editor: EditorConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Timings of the editor session machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// How long a slug check waits before publishing its result.
    pub slug_check_delay: Duration,
    /// Draft sessions untouched for this long are closed.
    pub idle_timeout: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            slug_check_delay: Duration::from_millis(800),
            idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl VitrineConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let database_url = env.database_url("VITRINE_DATABASE_URL")?;
        let host = env.parsed::<IpAddr>("VITRINE_HOST", "127.0.0.1")?;
        let port = env.parsed::<u16>("VITRINE_PORT", "3000")?;
        let base_url = env.base_url("VITRINE_BASE_URL")?;

        let editor = EditorConfig {
            slug_check_delay: Duration::from_millis(
                env.parsed::<u64>("VITRINE_SLUG_CHECK_DELAY_MS", "800")?,
            ),
            idle_timeout: Duration::from_secs(
                env.parsed::<u64>("VITRINE_EDITOR_IDLE_SECS", "1800")?,
            ),
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            editor,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parsed::<f32>("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, using `default` when unset.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .as_deref()
            .unwrap_or(default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// The public origin: must be an absolute http(s) URL.
    fn base_url(&self, key: &str) -> Result<String, ConfigError> {
        let raw = self.required(key)?;
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }
        Ok(raw.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<VitrineConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        VitrineConfig::from_lookup(|key| map.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("VITRINE_DATABASE_URL", "postgres://localhost/vitrine"),
        ("VITRINE_BASE_URL", "https://vitrine.bio/"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "https://vitrine.bio");
        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.editor.slug_check_delay, Duration::from_millis(800));
        assert!(config.sentry_dsn.is_none());
        assert!(config.is_secure());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[
            ("DATABASE_URL", "postgres://fly/db"),
            ("VITRINE_BASE_URL", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fly/db");
        assert!(!config.is_secure());
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("VITRINE_BASE_URL", "https://x.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(k) if k == "VITRINE_DATABASE_URL"));
        let err = load(&[("VITRINE_DATABASE_URL", "postgres://x")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(k) if k == "VITRINE_BASE_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("VITRINE_PORT", "http"));
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(k, _) if k == "VITRINE_PORT"
        ));

        let vars = [
            ("VITRINE_DATABASE_URL", "postgres://x"),
            ("VITRINE_BASE_URL", "vitrine.bio"),
        ];
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(k, _) if k == "VITRINE_BASE_URL"
        ));
    }

    #[test]
    fn test_editor_overrides() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("VITRINE_SLUG_CHECK_DELAY_MS", "50"));
        vars.push(("VITRINE_EDITOR_IDLE_SECS", "60"));
        let config = load(&vars).unwrap();
        assert_eq!(config.editor.slug_check_delay, Duration::from_millis(50));
        assert_eq!(config.editor.idle_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_debug_does_not_leak_database_url() {
        let config = load(MINIMAL).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("postgres://localhost/vitrine"));
    }
}
