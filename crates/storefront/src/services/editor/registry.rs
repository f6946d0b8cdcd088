//! Live draft sessions, keyed by user and vitrine.
//!
//! Sessions idle for longer than the configured TTL are evicted from the
//! cache and closed. Logging out closes all of a user's sessions.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use vitrine_core::{UserId, VitrineGateway, VitrineId};

use super::draft::{DraftError, DraftSession};
use crate::config::EditorConfig;
use crate::models::SessionContext;

type Key = (UserId, VitrineId);

/// Owns every open [`DraftSession`]. Clones share the same sessions.
#[derive(Clone)]
pub struct EditorRegistry<G> {
    gateway: G,
    sessions: Cache<Key, Arc<DraftSession<G>>>,
    slug_check_delay: Duration,
}

impl<G> EditorRegistry<G>
where
    G: VitrineGateway + Clone + 'static,
{
    #[must_use]
    pub fn new(gateway: G, config: EditorConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(config.idle_timeout)
            .eviction_listener(|key: Arc<Key>, session: Arc<DraftSession<G>>, cause| {
                debug!(user_id = %key.0, vitrine_id = %key.1, ?cause, "editor session evicted");
                session.close();
            })
            .build();

        Self {
            gateway,
            sessions,
            slug_check_delay: config.slug_check_delay,
        }
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Resume the user's session for `vitrine_id`, loading a new one if none
    /// is open.
    ///
    /// Concurrent opens of the same key share a single load.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Gateway`] if the vitrine cannot be loaded.
    #[instrument(skip(self, context), fields(user_id = %context.user_id))]
    pub async fn open(
        &self,
        context: &SessionContext,
        vitrine_id: VitrineId,
    ) -> Result<Arc<DraftSession<G>>, DraftError> {
        let key = (context.user_id, vitrine_id);
        loop {
            let session = self
                .sessions
                .try_get_with(key, async {
                    let session = DraftSession::load(
                        self.gateway.clone(),
                        context.clone(),
                        vitrine_id,
                        self.slug_check_delay,
                    )
                    .await?;
                    debug!("editor session opened");
                    Ok::<_, DraftError>(Arc::new(session))
                })
                .await
                .map_err(Arc::unwrap_or_clone)?;

            if !session.is_closed() {
                return Ok(session);
            }
            self.sessions.invalidate(&key).await;
        }
    }

    /// The user's open session for `vitrine_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::SessionClosed`] if none is open (never opened,
    /// closed, or evicted after idling).
    pub async fn session(
        &self,
        user_id: UserId,
        vitrine_id: VitrineId,
    ) -> Result<Arc<DraftSession<G>>, DraftError> {
        self.sessions
            .get(&(user_id, vitrine_id))
            .await
            .filter(|session| !session.is_closed())
            .ok_or(DraftError::SessionClosed)
    }

    /// Close and forget one session. Closing a missing session is a no-op.
    pub async fn close(&self, user_id: UserId, vitrine_id: VitrineId) {
        if let Some(session) = self.sessions.remove(&(user_id, vitrine_id)).await {
            session.close();
        }
    }

    /// Close every session of `user_id`.
    #[instrument(skip(self))]
    pub async fn close_user(&self, user_id: UserId) {
        let keys: Vec<Key> = self
            .sessions
            .iter()
            .filter(|(key, _)| key.0 == user_id)
            .map(|(key, _)| *key)
            .collect();
        for (user_id, vitrine_id) in keys {
            self.close(user_id, vitrine_id).await;
        }
    }

    /// Close every session editing `vitrine_id`, whoever holds it.
    pub async fn close_vitrine(&self, vitrine_id: VitrineId) {
        let keys: Vec<Key> = self
            .sessions
            .iter()
            .filter(|(key, _)| key.1 == vitrine_id)
            .map(|(key, _)| *key)
            .collect();
        for (user_id, vitrine_id) in keys {
            self.close(user_id, vitrine_id).await;
        }
    }

    /// Run moka's pending maintenance, delivering idle evictions.
    pub async fn run_pending_tasks(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vitrine_core::memory::MemoryGateway;
    use vitrine_core::{Email, NewVitrine, Slug};

    use super::*;

    fn context() -> SessionContext {
        SessionContext {
            user_id: UserId::generate(),
            email: Email::parse("ana@loja.com").unwrap(),
        }
    }

    async fn vitrine(gateway: &MemoryGateway, context: &SessionContext, slug: &str) -> VitrineId {
        gateway
            .create_vitrine(
                context.user_id,
                NewVitrine {
                    title: "Loja".to_string(),
                    slug: Slug::parse(slug).unwrap(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn registry(gateway: &MemoryGateway, idle: Duration) -> EditorRegistry<MemoryGateway> {
        EditorRegistry::new(
            gateway.clone(),
            EditorConfig {
                slug_check_delay: Duration::from_millis(10),
                idle_timeout: idle,
            },
        )
    }

    #[tokio::test]
    async fn test_open_resumes_same_session() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_secs(60));
        let ctx = context();
        let id = vitrine(&gateway, &ctx, "loja-a").await;

        let first = registry.open(&ctx, id).await.unwrap();
        let second = registry.open(&ctx, id).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(
            &first,
            &registry.session(ctx.user_id, id).await.unwrap()
        ));
    }

    #[tokio::test]
    async fn test_concurrent_opens_share_one_session() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_secs(60));
        let ctx = context();
        let id = vitrine(&gateway, &ctx, "loja-a").await;

        let hold = gateway.hold_reads().await;
        let first = tokio::spawn({
            let (registry, ctx) = (registry.clone(), ctx.clone());
            async move { registry.open(&ctx, id).await }
        });
        let second = tokio::spawn({
            let (registry, ctx) = (registry.clone(), ctx.clone());
            async move { registry.open(&ctx, id).await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        drop(hold);

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.is_closed());
        assert!(first.snapshot().await.is_ok());
    }

    #[tokio::test]
    async fn test_open_missing_vitrine_fails() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_secs(60));
        assert!(matches!(
            registry.open(&context(), VitrineId::generate()).await,
            Err(DraftError::Gateway(vitrine_core::GatewayError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_session_missing_is_closed() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_secs(60));
        assert!(matches!(
            registry.session(UserId::generate(), VitrineId::generate()).await,
            Err(DraftError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_close_user_closes_only_their_sessions() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_secs(60));
        let ana = context();
        let bia = context();
        let a1 = vitrine(&gateway, &ana, "loja-a1").await;
        let a2 = vitrine(&gateway, &ana, "loja-a2").await;
        let b1 = vitrine(&gateway, &bia, "loja-b1").await;

        let s1 = registry.open(&ana, a1).await.unwrap();
        let s2 = registry.open(&ana, a2).await.unwrap();
        let s3 = registry.open(&bia, b1).await.unwrap();

        registry.close_user(ana.user_id).await;

        assert!(s1.is_closed());
        assert!(s2.is_closed());
        assert!(!s3.is_closed());
        assert!(registry.session(ana.user_id, a1).await.is_err());
        assert!(registry.session(bia.user_id, b1).await.is_ok());
    }

    #[tokio::test]
    async fn test_reopen_after_close_loads_fresh_session() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_secs(60));
        let ctx = context();
        let id = vitrine(&gateway, &ctx, "loja-a").await;

        let first = registry.open(&ctx, id).await.unwrap();
        registry.close(ctx.user_id, id).await;
        let second = registry.open(&ctx, id).await.unwrap();

        assert!(first.is_closed());
        assert!(!second.is_closed());
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted_and_closed() {
        let gateway = MemoryGateway::new();
        let registry = registry(&gateway, Duration::from_millis(50));
        let ctx = context();
        let id = vitrine(&gateway, &ctx, "loja-a").await;

        let session = registry.open(&ctx, id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        registry.run_pending_tasks().await;

        assert!(session.is_closed());
        assert!(registry.session(ctx.user_id, id).await.is_err());
    }
}
