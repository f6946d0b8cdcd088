//! Seed a published demo vitrine for local development.
//!
//! # Usage
//!
//! ```bash
//! vitrine-cli seed demo -e ana@example.com -p 'a long password' --slug demo
//! ```
//!
//! The account must already exist (see `user create`); the password is checked
//! the same way the login endpoint does.

use rust_decimal::Decimal;
use tracing::info;

use vitrine_core::{
    NewVitrine, ProductFields, Slug, SocialLinks, SocialPlatform, Theme, VitrineChanges,
    VitrineGateway,
};
use vitrine_storefront::db::PgGateway;
use vitrine_storefront::services::AuthService;

use super::{CommandError, connect};

fn demo_products() -> Vec<ProductFields> {
    vec![
        ProductFields {
            name: "Camiseta Básica".to_string(),
            description: Some("Algodão orgânico, várias cores".to_string()),
            price: Some(Decimal::new(4990, 2)),
            original_price: Some(Decimal::new(7990, 2)),
            external_link: Some("https://pay.example.com/camiseta".to_string()),
            category: Some("Roupas".to_string()),
            is_featured: true,
            ..ProductFields::default()
        },
        ProductFields {
            name: "Ecobag".to_string(),
            price: Some(Decimal::new(2500, 2)),
            external_link: Some("https://pay.example.com/ecobag".to_string()),
            button_text: Some("Quero a minha".to_string()),
            category: Some("Acessórios".to_string()),
            ..ProductFields::default()
        },
        ProductFields {
            name: "Consultoria de estilo".to_string(),
            description: Some("Uma hora por videochamada".to_string()),
            ..ProductFields::default()
        },
    ]
}

/// Create a published vitrine with three products for the given account.
///
/// # Errors
///
/// Returns an error for bad credentials, an invalid or taken slug, or a
/// failed write.
pub async fn demo(email: &str, password: &str, slug: &str) -> Result<(), CommandError> {
    let slug = Slug::parse(slug)?;
    let pool = connect().await?;

    let user = AuthService::new(&pool).login(email, password).await?;
    let gateway = PgGateway::new(pool);

    let vitrine = gateway
        .create_vitrine(
            user.id,
            NewVitrine {
                title: "Loja Demo".to_string(),
                slug,
                description: Some("Tudo o que eu uso e recomendo".to_string()),
            },
        )
        .await?;

    let changes = VitrineChanges {
        social_links: Some(
            SocialLinks::new()
                .with(SocialPlatform::Instagram, "lojademo")
                .with(SocialPlatform::Whatsapp, "5511999999999"),
        ),
        is_published: Some(true),
        ..Theme::Vibrant.changes()
    };
    changes.validate()?;
    gateway.update_vitrine(user.id, vitrine.id, &changes).await?;

    for (position, fields) in (0u32..).zip(demo_products()) {
        let data = fields.validate()?;
        gateway
            .insert_product(user.id, vitrine.id, &data, position)
            .await?;
    }

    info!("Demo vitrine seeded!");
    info!("  ID: {}", vitrine.id);
    info!("  Slug: {}", vitrine.slug);
    Ok(())
}
