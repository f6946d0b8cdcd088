//! Integration tests for the `PostgreSQL` gateway.
//!
//! These tests require:
//! - A running `PostgreSQL` database (`VITRINE_DATABASE_URL` or `DATABASE_URL`)
//!
//! Migrations are applied by the first test that connects.
//!
//! Run with: cargo test -p vitrine-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use vitrine_core::{
    GatewayError, NewVitrine, ProductFields, Slug, Theme, UserId, VitrineChanges, VitrineGateway,
};
use vitrine_integration_tests::{database_url, unique_email};
use vitrine_storefront::db::{PgGateway, create_pool};
use vitrine_storefront::services::AuthService;

async fn pool() -> PgPool {
    let pool = create_pool(&database_url()).await.unwrap();
    sqlx::migrate!("../storefront/migrations")
        .run(&pool)
        .await
        .unwrap();
    pool
}

async fn user(pool: &PgPool) -> UserId {
    AuthService::new(pool)
        .register(&unique_email(), "correct horse battery")
        .await
        .unwrap()
        .id
}

fn unique_slug() -> Slug {
    Slug::parse(&format!("teste-{}", Uuid::new_v4().simple())).unwrap()
}

fn new_vitrine(slug: Slug) -> NewVitrine {
    NewVitrine {
        title: "Loja Teste".to_string(),
        slug,
        description: Some("Criada pelos testes".to_string()),
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_vitrine_round_trip() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let gateway = PgGateway::new(pool);

    let created = gateway
        .create_vitrine(owner, new_vitrine(unique_slug()))
        .await
        .unwrap();
    assert!(!created.is_published);

    gateway
        .update_vitrine(owner, created.id, &Theme::Influencer.changes())
        .await
        .unwrap();
    let loaded = gateway.get_vitrine(owner, created.id).await.unwrap();
    assert_eq!(Theme::matching(&loaded.style), Some(Theme::Influencer));

    let listed = gateway.list_vitrines(owner).await.unwrap();
    assert_eq!(listed.len(), 1);

    gateway.delete_vitrine(owner, created.id).await.unwrap();
    assert!(matches!(
        gateway.get_vitrine(owner, created.id).await,
        Err(GatewayError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_other_owners_cannot_touch_a_vitrine() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let stranger = user(&pool).await;
    let gateway = PgGateway::new(pool);

    let created = gateway
        .create_vitrine(owner, new_vitrine(unique_slug()))
        .await
        .unwrap();

    assert!(matches!(
        gateway.get_vitrine(stranger, created.id).await,
        Err(GatewayError::NotFound)
    ));
    assert!(matches!(
        gateway
            .update_vitrine(stranger, created.id, &VitrineChanges::publish(true))
            .await,
        Err(GatewayError::NotFound)
    ));
    assert!(matches!(
        gateway.list_products(stranger, created.id).await,
        Err(GatewayError::NotFound)
    ));
    let data = ProductFields {
        name: "Intruso".to_string(),
        ..ProductFields::default()
    }
    .validate()
    .unwrap();
    assert!(matches!(
        gateway.insert_product(stranger, created.id, &data, 0).await,
        Err(GatewayError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_slug_conflicts() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let gateway = PgGateway::new(pool);
    let slug = unique_slug();

    gateway
        .create_vitrine(owner, new_vitrine(slug.clone()))
        .await
        .unwrap();
    assert!(matches!(
        gateway.create_vitrine(owner, new_vitrine(slug)).await,
        Err(GatewayError::Conflict(_))
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_published_page_and_visits() {
    let pool = pool().await;
    let owner = user(&pool).await;
    let gateway = PgGateway::new(pool);
    let slug = unique_slug();

    let created = gateway
        .create_vitrine(owner, new_vitrine(slug.clone()))
        .await
        .unwrap();
    for (position, name) in (0u32..).zip(["Primeiro", "Segundo"]) {
        let data = ProductFields {
            name: name.to_string(),
            price: Some(Decimal::new(1990, 2)),
            ..ProductFields::default()
        }
        .validate()
        .unwrap();
        gateway
            .insert_product(owner, created.id, &data, position)
            .await
            .unwrap();
    }

    assert!(gateway.find_published(&slug).await.unwrap().is_none());

    gateway
        .update_vitrine(owner, created.id, &VitrineChanges::publish(true))
        .await
        .unwrap();
    let published = gateway.find_published(&slug).await.unwrap().unwrap();
    let names: Vec<_> = published
        .products
        .iter()
        .map(|p| p.data.name.as_str())
        .collect();
    assert_eq!(names, vec!["Primeiro", "Segundo"]);

    gateway.record_visit(created.id).await.unwrap();
    gateway.record_visit(created.id).await.unwrap();
    let analytics = gateway.list_analytics(owner).await.unwrap();
    let counter = analytics
        .iter()
        .find(|a| a.vitrine_id == created.id)
        .unwrap();
    assert_eq!(counter.visits_count, 2);
    assert!(counter.last_visit.is_some());
}
