//! Persistence boundary for vitrines, products and analytics.
//!
//! Every editor operation goes through [`VitrineGateway`]. Reads and writes
//! are scoped to an owner: asking for another user's vitrine is
//! indistinguishable from asking for one that does not exist.

use std::future::Future;

use crate::models::{
    NewVitrine, Product, ProductData, PublishedVitrine, Vitrine, VitrineAnalytics,
    VitrineChanges,
};
use crate::types::{ProductId, Slug, UserId, VitrineId};

/// Errors surfaced by a gateway.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The row does not exist or belongs to someone else.
    #[error("not found")]
    NotFound,
    /// A uniqueness constraint rejected the write (e.g. slug taken).
    #[error("conflict: {0}")]
    Conflict(String),
    /// The store could not be reached or failed.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Row-level CRUD over the three editor entities.
pub trait VitrineGateway: Send + Sync {
    /// All vitrines owned by `owner`, newest first.
    fn list_vitrines(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Vec<Vitrine>, GatewayError>> + Send;

    fn get_vitrine(
        &self,
        owner: UserId,
        id: VitrineId,
    ) -> impl Future<Output = Result<Vitrine, GatewayError>> + Send;

    fn create_vitrine(
        &self,
        owner: UserId,
        new: NewVitrine,
    ) -> impl Future<Output = Result<Vitrine, GatewayError>> + Send;

    /// Write the given fields. Fields left `None` keep their stored value.
    fn update_vitrine(
        &self,
        owner: UserId,
        id: VitrineId,
        changes: &VitrineChanges,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Delete a vitrine together with its products and analytics.
    fn delete_vitrine(
        &self,
        owner: UserId,
        id: VitrineId,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Products of a vitrine ordered by `position`, then creation time.
    fn list_products(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
    ) -> impl Future<Output = Result<Vec<Product>, GatewayError>> + Send;

    fn insert_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        data: &ProductData,
        position: u32,
    ) -> impl Future<Output = Result<Product, GatewayError>> + Send;

    /// Replace a product's fields. Position and creation time are kept.
    fn update_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
        data: &ProductData,
    ) -> impl Future<Output = Result<Product, GatewayError>> + Send;

    fn delete_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Analytics rows of every vitrine owned by `owner`.
    fn list_analytics(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Vec<VitrineAnalytics>, GatewayError>> + Send;

    /// Public read: the published vitrine at `slug` and its products.
    ///
    /// Unpublished vitrines are reported as `None`.
    fn find_published(
        &self,
        slug: &Slug,
    ) -> impl Future<Output = Result<Option<PublishedVitrine>, GatewayError>> + Send;

    /// Count one public page view.
    fn record_visit(
        &self,
        vitrine_id: VitrineId,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}
