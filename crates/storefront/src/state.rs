//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::VitrineConfig;
use crate::db::PgGateway;
use crate::services::editor::EditorRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: VitrineConfig,
    pool: PgPool,
    gateway: PgGateway,
    editors: EditorRegistry<PgGateway>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: VitrineConfig, pool: PgPool) -> Self {
        let gateway = PgGateway::new(pool.clone());
        let editors = EditorRegistry::new(gateway.clone(), config.editor);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gateway,
                editors,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &VitrineConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the persistence gateway.
    #[must_use]
    pub fn gateway(&self) -> &PgGateway {
        &self.inner.gateway
    }

    /// Get a reference to the open editor sessions.
    #[must_use]
    pub fn editors(&self) -> &EditorRegistry<PgGateway> {
        &self.inner.editors
    }
}
