//! Public vitrine pages.
//!
//! `/v/{slug}` renders a published vitrine with the same layout the editor
//! preview draws from. Unknown, unpublished and malformed slugs all get the
//! same not-found page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use vitrine_core::{Layout, SharePreview, Slug, VitrineGateway, render};

use super::editor::PreviewQuery;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Published vitrine page.
#[derive(Template, WebTemplate)]
#[template(path = "vitrine/show.html")]
pub struct VitrineTemplate {
    pub layout: Layout,
    pub share: SharePreview,
}

/// Not-found page for public slugs.
#[derive(Template, WebTemplate)]
#[template(path = "vitrine/not_found.html")]
pub struct NotFoundTemplate {
    pub slug: String,
}

fn not_found(slug: String) -> Response {
    (StatusCode::NOT_FOUND, NotFoundTemplate { slug }).into_response()
}

/// GET /v/{slug}
///
/// Counts a visit on every successful view. A failed count is logged and the
/// page is served anyway.
pub async fn show(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response> {
    let Ok(slug) = Slug::parse(&raw) else {
        return Ok(not_found(raw));
    };

    let gateway = state.gateway();
    let Some(published) = gateway.find_published(&slug).await? else {
        return Ok(not_found(raw));
    };

    if let Err(e) = gateway.record_visit(published.vitrine.id).await {
        tracing::warn!(vitrine_id = %published.vitrine.id, error = %e, "failed to record visit");
    }

    let template = VitrineTemplate {
        layout: render(&published.vitrine, &published.products, query.mode),
        share: published.vitrine.share_preview(&state.config().base_url),
    };
    Ok(template.into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use vitrine_core::{
        NewVitrine, Price, Product, ProductData, ProductId, StyleOverrides, UserId, ViewportMode,
        Vitrine, VitrineId,
    };

    use super::*;

    fn vitrine() -> Vitrine {
        let mut vitrine = Vitrine::from_new(
            VitrineId::generate(),
            UserId::generate(),
            NewVitrine {
                title: "<b>Loja</b> da Ana".to_string(),
                slug: Slug::parse("loja-da-ana").unwrap(),
                description: Some("Achados & indicações".to_string()),
            },
            Utc::now(),
        );
        vitrine.style.custom_css = StyleOverrides::parse("font-size: 18px").unwrap();
        vitrine.is_published = true;
        vitrine
    }

    fn product(vitrine: &Vitrine) -> Product {
        Product {
            id: ProductId::generate(),
            vitrine_id: vitrine.id,
            data: ProductData {
                name: "Caneca".to_string(),
                description: None,
                price: Some(Price::new(Decimal::new(3500, 2)).unwrap()),
                original_price: None,
                image_url: None,
                external_link: Some("https://pay.example.com/caneca".to_string()),
                button_text: "Comprar".to_string(),
                category: None,
                is_featured: false,
                stock_quantity: None,
            },
            position: 0,
            created_at: Utc::now(),
        }
    }

    fn page(mode: ViewportMode) -> String {
        let vitrine = vitrine();
        let products = vec![product(&vitrine)];
        VitrineTemplate {
            layout: render(&vitrine, &products, mode),
            share: vitrine.share_preview("https://vitrine.bio"),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_page_escapes_owner_text() {
        let html = page(ViewportMode::Mobile);
        assert!(!html.contains("<b>Loja</b>"));
        assert!(html.contains("&lt;b&gt;Loja&lt;/b&gt; da Ana"));
    }

    #[test]
    fn test_page_carries_share_metadata() {
        let html = page(ViewportMode::Mobile);
        assert!(html.contains(r#"<meta property="og:url" content="https://vitrine.bio/v/loja-da-ana">"#));
        assert!(html.contains("og:description"));
    }

    #[test]
    fn test_page_emits_scoped_overrides_unescaped() {
        let html = page(ViewportMode::Mobile);
        assert!(html.contains("<style>.vitrine-container { font-size: 18px; }</style>"));
    }

    #[test]
    fn test_page_renders_cards_and_columns() {
        let html = page(ViewportMode::Desktop);
        assert!(html.contains(r#"data-columns="2""#));
        assert!(html.contains("Caneca"));
        assert!(html.contains("R$ 35.00"));
        assert!(html.contains(r#"href="https://pay.example.com/caneca""#));
        assert!(html.contains(">Comprar</a>"));
    }

    #[test]
    fn test_not_found_page_escapes_slug() {
        let html = NotFoundTemplate {
            slug: "<x>".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("/v/&lt;x&gt;"));
    }
}
