//! `PostgreSQL` implementation of [`VitrineGateway`].

use sqlx::PgPool;
use tracing::instrument;

use vitrine_core::{
    GatewayError, NewVitrine, Product, ProductData, ProductId, PublishedVitrine, Slug, UserId,
    Vitrine, VitrineAnalytics, VitrineChanges, VitrineGateway, VitrineId,
};

use super::{AnalyticsRepository, ProductRepository, VitrineRepository};

/// Gateway over the storefront's connection pool.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn vitrines(&self) -> VitrineRepository<'_> {
        VitrineRepository::new(&self.pool)
    }

    fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.pool)
    }

    fn analytics(&self) -> AnalyticsRepository<'_> {
        AnalyticsRepository::new(&self.pool)
    }
}

impl VitrineGateway for PgGateway {
    async fn list_vitrines(&self, owner: UserId) -> Result<Vec<Vitrine>, GatewayError> {
        Ok(self.vitrines().list_for_owner(owner).await?)
    }

    async fn get_vitrine(&self, owner: UserId, id: VitrineId) -> Result<Vitrine, GatewayError> {
        Ok(self.vitrines().get(owner, id).await?)
    }

    async fn create_vitrine(&self, owner: UserId, new: NewVitrine) -> Result<Vitrine, GatewayError> {
        Ok(self.vitrines().create(owner, &new).await?)
    }

    async fn update_vitrine(
        &self,
        owner: UserId,
        id: VitrineId,
        changes: &VitrineChanges,
    ) -> Result<(), GatewayError> {
        Ok(self.vitrines().update(owner, id, changes).await?)
    }

    async fn delete_vitrine(&self, owner: UserId, id: VitrineId) -> Result<(), GatewayError> {
        Ok(self.vitrines().delete(owner, id).await?)
    }

    #[instrument(skip(self))]
    async fn list_products(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
    ) -> Result<Vec<Product>, GatewayError> {
        if !self.vitrines().is_owned_by(owner, vitrine_id).await? {
            return Err(GatewayError::NotFound);
        }
        Ok(self.products().list_for_vitrine(vitrine_id).await?)
    }

    async fn insert_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        data: &ProductData,
        position: u32,
    ) -> Result<Product, GatewayError> {
        Ok(self
            .products()
            .insert(owner, vitrine_id, data, position)
            .await?)
    }

    async fn update_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
        data: &ProductData,
    ) -> Result<Product, GatewayError> {
        Ok(self.products().update(owner, vitrine_id, id, data).await?)
    }

    async fn delete_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
    ) -> Result<(), GatewayError> {
        Ok(self.products().delete(owner, vitrine_id, id).await?)
    }

    async fn list_analytics(&self, owner: UserId) -> Result<Vec<VitrineAnalytics>, GatewayError> {
        Ok(self.analytics().list_for_owner(owner).await?)
    }

    #[instrument(skip(self), fields(slug = %slug))]
    async fn find_published(&self, slug: &Slug) -> Result<Option<PublishedVitrine>, GatewayError> {
        let Some(vitrine) = self.vitrines().get_published(slug).await? else {
            return Ok(None);
        };
        let products = self.products().list_for_vitrine(vitrine.id).await?;
        Ok(Some(PublishedVitrine { vitrine, products }))
    }

    async fn record_visit(&self, vitrine_id: VitrineId) -> Result<(), GatewayError> {
        Ok(self.analytics().record_visit(vitrine_id).await?)
    }
}

