//! In-memory [`VitrineGateway`] for tests and local tooling.
//!
//! Behaves like the Postgres gateway (owner scoping, unique slugs, product
//! ordering) and adds hooks to make writes fail and to stall reads or writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::gateway::{GatewayError, VitrineGateway};
use crate::models::{
    NewVitrine, Product, ProductData, PublishedVitrine, Vitrine, VitrineAnalytics,
    VitrineChanges,
};
use crate::types::{ProductId, Slug, UserId, VitrineId};

#[derive(Default)]
struct Store {
    vitrines: HashMap<VitrineId, Vitrine>,
    products: HashMap<ProductId, Product>,
    analytics: HashMap<VitrineId, VitrineAnalytics>,
}

impl Store {
    fn owned(&self, owner: UserId, id: VitrineId) -> Result<&Vitrine, GatewayError> {
        self.vitrines
            .get(&id)
            .filter(|v| v.owner == owner)
            .ok_or(GatewayError::NotFound)
    }

    fn slug_taken(&self, slug: &Slug, except: Option<VitrineId>) -> bool {
        self.vitrines
            .values()
            .any(|v| &v.slug == slug && Some(v.id) != except)
    }

    fn products_of(&self, vitrine_id: VitrineId) -> Vec<Product> {
        let mut products: Vec<_> = self
            .products
            .values()
            .filter(|p| p.vitrine_id == vitrine_id)
            .cloned()
            .collect();
        products.sort_by_key(|p| (p.position, p.created_at));
        products
    }
}

/// A gateway backed by a `HashMap`. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    store: Arc<Mutex<Store>>,
    write_gate: Arc<RwLock<()>>,
    read_gate: Arc<RwLock<()>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`GatewayError::Backend`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stall writes until the returned guard is dropped.
    ///
    /// Writes issued while held wait; reads are unaffected.
    pub async fn hold_writes(&self) -> OwnedRwLockWriteGuard<()> {
        Arc::clone(&self.write_gate).write_owned().await
    }

    /// Stall [`VitrineGateway::get_vitrine`] until the returned guard is
    /// dropped.
    pub async fn hold_reads(&self) -> OwnedRwLockWriteGuard<()> {
        Arc::clone(&self.read_gate).write_owned().await
    }

    /// Number of write calls that reached the store, failed ones included.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Insert a vitrine as-is, bypassing the write hooks.
    pub fn seed_vitrine(&self, vitrine: Vitrine) {
        self.lock().vitrines.insert(vitrine.id, vitrine);
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    async fn begin_write(&self) -> Result<(), GatewayError> {
        drop(self.write_gate.read().await);
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl VitrineGateway for MemoryGateway {
    async fn list_vitrines(&self, owner: UserId) -> Result<Vec<Vitrine>, GatewayError> {
        let store = self.lock();
        let mut vitrines: Vec<_> = store
            .vitrines
            .values()
            .filter(|v| v.owner == owner)
            .cloned()
            .collect();
        vitrines.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vitrines)
    }

    async fn get_vitrine(&self, owner: UserId, id: VitrineId) -> Result<Vitrine, GatewayError> {
        drop(self.read_gate.read().await);
        self.lock().owned(owner, id).cloned()
    }

    async fn create_vitrine(
        &self,
        owner: UserId,
        new: NewVitrine,
    ) -> Result<Vitrine, GatewayError> {
        self.begin_write().await?;
        let mut store = self.lock();
        if store.slug_taken(&new.slug, None) {
            return Err(GatewayError::Conflict(format!("slug {} is taken", new.slug)));
        }
        let vitrine = Vitrine::from_new(VitrineId::generate(), owner, new, Utc::now());
        store.vitrines.insert(vitrine.id, vitrine.clone());
        Ok(vitrine)
    }

    async fn update_vitrine(
        &self,
        owner: UserId,
        id: VitrineId,
        changes: &VitrineChanges,
    ) -> Result<(), GatewayError> {
        self.begin_write().await?;
        let mut store = self.lock();
        store.owned(owner, id)?;
        if let Some(slug) = &changes.slug
            && store.slug_taken(slug, Some(id))
        {
            return Err(GatewayError::Conflict(format!("slug {slug} is taken")));
        }
        if let Some(vitrine) = store.vitrines.get_mut(&id) {
            vitrine.apply(changes);
        }
        Ok(())
    }

    async fn delete_vitrine(&self, owner: UserId, id: VitrineId) -> Result<(), GatewayError> {
        self.begin_write().await?;
        let mut store = self.lock();
        store.owned(owner, id)?;
        store.vitrines.remove(&id);
        store.products.retain(|_, p| p.vitrine_id != id);
        store.analytics.remove(&id);
        Ok(())
    }

    async fn list_products(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
    ) -> Result<Vec<Product>, GatewayError> {
        let store = self.lock();
        store.owned(owner, vitrine_id)?;
        Ok(store.products_of(vitrine_id))
    }

    async fn insert_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        data: &ProductData,
        position: u32,
    ) -> Result<Product, GatewayError> {
        self.begin_write().await?;
        let mut store = self.lock();
        store.owned(owner, vitrine_id)?;
        let product = Product {
            id: ProductId::generate(),
            vitrine_id,
            data: data.clone(),
            position,
            created_at: Utc::now(),
        };
        store.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
        data: &ProductData,
    ) -> Result<Product, GatewayError> {
        self.begin_write().await?;
        let mut store = self.lock();
        store.owned(owner, vitrine_id)?;
        let product = store
            .products
            .get_mut(&id)
            .filter(|p| p.vitrine_id == vitrine_id)
            .ok_or(GatewayError::NotFound)?;
        product.data = data.clone();
        Ok(product.clone())
    }

    async fn delete_product(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
    ) -> Result<(), GatewayError> {
        self.begin_write().await?;
        let mut store = self.lock();
        store.owned(owner, vitrine_id)?;
        match store.products.get(&id) {
            Some(p) if p.vitrine_id == vitrine_id => {
                store.products.remove(&id);
                Ok(())
            }
            _ => Err(GatewayError::NotFound),
        }
    }

    async fn list_analytics(&self, owner: UserId) -> Result<Vec<VitrineAnalytics>, GatewayError> {
        let store = self.lock();
        Ok(store
            .analytics
            .values()
            .filter(|a| {
                store
                    .vitrines
                    .get(&a.vitrine_id)
                    .is_some_and(|v| v.owner == owner)
            })
            .cloned()
            .collect())
    }

    async fn find_published(
        &self,
        slug: &Slug,
    ) -> Result<Option<PublishedVitrine>, GatewayError> {
        let store = self.lock();
        Ok(store
            .vitrines
            .values()
            .find(|v| &v.slug == slug && v.is_published)
            .map(|v| PublishedVitrine {
                vitrine: v.clone(),
                products: store.products_of(v.id),
            }))
    }

    async fn record_visit(&self, vitrine_id: VitrineId) -> Result<(), GatewayError> {
        let mut store = self.lock();
        let entry = store
            .analytics
            .entry(vitrine_id)
            .or_insert_with(|| VitrineAnalytics {
                vitrine_id,
                visits_count: 0,
                last_visit: None,
            });
        entry.visits_count += 1;
        entry.last_visit = Some(Utc::now());
        Ok(())
    }
}
