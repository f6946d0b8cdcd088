//! Draft state of one vitrine being edited.
//!
//! The draft mirrors what the store holds. Every mutation writes through the
//! gateway first and only touches the draft once the write succeeded, so a
//! failed save leaves the draft exactly as it was.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, instrument};

use vitrine_core::{
    ColorPreset, GatewayError, Product, ProductFields, ProductId, Slug, Theme, ValidationError,
    Vitrine, VitrineChanges, VitrineGateway, VitrineId,
};

use super::slug_check::{CheckOutcome, SlugChecker};
use crate::models::SessionContext;

/// Errors returned by draft operations.
#[derive(Debug, Clone, Error)]
pub enum DraftError {
    /// Input was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The write failed; the draft is unchanged.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The slug checker reported the new slug as unavailable.
    #[error("slug is not available")]
    SlugUnavailable,

    /// Another mutation of this session is in flight.
    #[error("another change is still being saved")]
    Busy,

    /// The session was closed; late results are discarded.
    #[error("editor session is closed")]
    SessionClosed,
}

/// What the editor shows: the held vitrine, its products and when it was
/// last saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSnapshot {
    pub vitrine: Vitrine,
    pub products: Vec<Product>,
    pub last_saved: DateTime<Utc>,
}

#[derive(Debug)]
struct Draft {
    vitrine: Vitrine,
    products: Vec<Product>,
    last_saved: DateTime<Utc>,
}

impl Draft {
    fn touch(&mut self) {
        self.last_saved = Utc::now();
    }

    fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            vitrine: self.vitrine.clone(),
            products: self.products.clone(),
            last_saved: self.last_saved,
        }
    }
}

/// A live editing session over one vitrine.
///
/// Mutations are processed one at a time; a second mutation issued while one
/// is in flight fails with [`DraftError::Busy`].
pub struct DraftSession<G> {
    gateway: G,
    context: SessionContext,
    vitrine_id: VitrineId,
    draft: Mutex<Draft>,
    /// The stored slug, readable without the mutation slot.
    saved_slug: watch::Sender<Slug>,
    slug: SlugChecker,
    closed: AtomicBool,
}

impl<G: VitrineGateway> DraftSession<G> {
    /// Load the vitrine owned by `context` and its products.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Gateway`] with [`GatewayError::NotFound`] when the
    /// vitrine does not exist or belongs to another user.
    #[instrument(skip(gateway, context), fields(user_id = %context.user_id))]
    pub async fn load(
        gateway: G,
        context: SessionContext,
        vitrine_id: VitrineId,
        slug_check_delay: Duration,
    ) -> Result<Self, DraftError> {
        let vitrine = gateway.get_vitrine(context.user_id, vitrine_id).await?;
        let products = gateway.list_products(context.user_id, vitrine_id).await?;

        Ok(Self {
            gateway,
            context,
            vitrine_id,
            saved_slug: watch::Sender::new(vitrine.slug.clone()),
            draft: Mutex::new(Draft {
                vitrine,
                products,
                last_saved: Utc::now(),
            }),
            slug: SlugChecker::new(slug_check_delay),
            closed: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub const fn vitrine_id(&self) -> VitrineId {
        self.vitrine_id
    }

    #[must_use]
    pub const fn slug_checker(&self) -> &SlugChecker {
        &self.slug
    }

    /// Current draft. Waits for an in-flight mutation to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::SessionClosed`] after [`DraftSession::close`].
    pub async fn snapshot(&self) -> Result<DraftSnapshot, DraftError> {
        self.ensure_open()?;
        Ok(self.draft.lock().await.snapshot())
    }

    /// When the last successful write happened (load time if none).
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::SessionClosed`] after [`DraftSession::close`].
    pub async fn last_saved(&self) -> Result<DateTime<Utc>, DraftError> {
        self.ensure_open()?;
        Ok(self.draft.lock().await.last_saved)
    }

    /// Persist `changes`, then merge them into the draft.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Validation`] for a blank title,
    /// [`DraftError::SlugUnavailable`] when a slug change is gated, and
    /// [`DraftError::Gateway`] when the write fails.
    pub async fn update_vitrine(&self, changes: &VitrineChanges) -> Result<DraftSnapshot, DraftError> {
        let mut draft = self.begin()?;
        changes.validate()?;
        self.save_vitrine(&mut draft, changes).await
    }

    /// Replace the four colors with a preset's.
    ///
    /// # Errors
    ///
    /// See [`DraftSession::update_vitrine`].
    pub async fn apply_preset(&self, preset: ColorPreset) -> Result<DraftSnapshot, DraftError> {
        let mut draft = self.begin()?;
        self.save_vitrine(&mut draft, &preset.changes()).await
    }

    /// Replace colors, font and layout with a theme's.
    ///
    /// # Errors
    ///
    /// See [`DraftSession::update_vitrine`].
    pub async fn apply_theme(&self, theme: Theme) -> Result<DraftSnapshot, DraftError> {
        let mut draft = self.begin()?;
        self.save_vitrine(&mut draft, &theme.changes()).await
    }

    /// Flip `is_published`.
    ///
    /// # Errors
    ///
    /// See [`DraftSession::update_vitrine`].
    pub async fn toggle_publish(&self) -> Result<DraftSnapshot, DraftError> {
        let mut draft = self.begin()?;
        let changes = VitrineChanges::publish(!draft.vitrine.is_published);
        self.save_vitrine(&mut draft, &changes).await
    }

    /// Check a candidate slug against the saved one.
    ///
    /// Never touches the draft lock: a check runs alongside an in-flight save
    /// and never makes a mutation report [`DraftError::Busy`].
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::SessionClosed`] after [`DraftSession::close`].
    pub async fn check_slug(&self, candidate: &str) -> Result<CheckOutcome, DraftError> {
        self.ensure_open()?;
        let persisted = self.saved_slug.borrow().clone();
        Ok(self.slug.check(candidate, &persisted).await)
    }

    /// Validate and append a product at `position = products.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Validation`] for an empty name or negative
    /// numbers, and [`DraftError::Gateway`] when the write fails.
    #[instrument(skip(self, fields), fields(vitrine_id = %self.vitrine_id))]
    pub async fn add_product(&self, fields: ProductFields) -> Result<Product, DraftError> {
        let mut draft = self.begin()?;
        let data = fields.validate()?;
        let position = u32::try_from(draft.products.len()).unwrap_or(u32::MAX);

        let product = self
            .gateway
            .insert_product(self.context.user_id, self.vitrine_id, &data, position)
            .await?;
        self.ensure_open()?;

        draft.products.push(product.clone());
        draft.touch();
        Ok(product)
    }

    /// Validate and replace a product's fields. Its position is kept.
    ///
    /// # Errors
    ///
    /// See [`DraftSession::add_product`].
    #[instrument(skip(self, fields), fields(vitrine_id = %self.vitrine_id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, DraftError> {
        let mut draft = self.begin()?;
        let data = fields.validate()?;

        let product = self
            .gateway
            .update_product(self.context.user_id, self.vitrine_id, id, &data)
            .await?;
        self.ensure_open()?;

        match draft.products.iter_mut().find(|p| p.id == id) {
            Some(slot) => *slot = product.clone(),
            None => draft.products.push(product.clone()),
        }
        draft.touch();
        Ok(product)
    }

    /// Delete a product. Remaining positions are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Gateway`] when the delete fails.
    #[instrument(skip(self), fields(vitrine_id = %self.vitrine_id))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), DraftError> {
        let mut draft = self.begin()?;

        self.gateway
            .delete_product(self.context.user_id, self.vitrine_id, id)
            .await?;
        self.ensure_open()?;

        draft.products.retain(|p| p.id != id);
        draft.touch();
        Ok(())
    }

    /// Close the session. Results of writes still in flight are discarded.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(vitrine_id = %self.vitrine_id, "editor session closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), DraftError> {
        if self.is_closed() {
            return Err(DraftError::SessionClosed);
        }
        Ok(())
    }

    /// Take the mutation slot.
    fn begin(&self) -> Result<MutexGuard<'_, Draft>, DraftError> {
        self.ensure_open()?;
        self.draft.try_lock().map_err(|_| DraftError::Busy)
    }

    #[instrument(skip(self, draft, changes), fields(vitrine_id = %self.vitrine_id))]
    async fn save_vitrine(
        &self,
        draft: &mut Draft,
        changes: &VitrineChanges,
    ) -> Result<DraftSnapshot, DraftError> {
        let moves_slug = changes.changes_slug(&draft.vitrine.slug);
        if let Some(slug) = changes.slug.as_ref().filter(|_| moves_slug)
            && !self.slug.allows_save(slug)
        {
            return Err(DraftError::SlugUnavailable);
        }

        self.gateway
            .update_vitrine(self.context.user_id, self.vitrine_id, changes)
            .await?;
        self.ensure_open()?;

        draft.vitrine.apply(changes);
        draft.touch();
        if moves_slug {
            self.saved_slug.send_replace(draft.vitrine.slug.clone());
            self.slug.reset();
        }
        Ok(draft.snapshot())
    }
}
