//! Layout of a vitrine page.
//!
//! [`render`] turns a vitrine and its products into a [`Layout`]: a flat,
//! display-ready description that the editor preview (HTML fragment or JSON)
//! and the public page both draw from. Nothing here is HTML; templates decide
//! markup and escaping.

use serde::Serialize;

use crate::models::{Product, Vitrine};
use crate::types::{LayoutStyle, ProductId, SocialPlatform, ViewportMode};

/// Grid column count for `product_count` products in `mode`.
///
/// ```
/// use vitrine_core::{ViewportMode, preview::columns};
///
/// assert_eq!(columns(ViewportMode::Mobile, 3), 1);
/// assert_eq!(columns(ViewportMode::Desktop, 3), 2);
/// assert_eq!(columns(ViewportMode::Desktop, 5), 3);
/// ```
#[must_use]
pub const fn columns(mode: ViewportMode, product_count: usize) -> u8 {
    match mode {
        ViewportMode::Mobile => 1,
        ViewportMode::Desktop if product_count > 4 => 3,
        ViewportMode::Desktop => 2,
    }
}

/// Everything needed to draw a vitrine page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub mode: ViewportMode,
    pub columns: u8,
    pub theme: PageTheme,
    pub header: Header,
    pub social_links: Vec<SocialButton>,
    pub cards: Vec<ProductCard>,
    pub card_decoration: CardDecoration,
    /// No products: the page shows its empty state instead of a grid.
    pub is_empty: bool,
    /// Sanitized owner overrides, already scoped to `.vitrine-container`.
    pub scoped_css: Option<String>,
}

/// Colors and font the page is painted with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageTheme {
    pub background_color: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub font_family: String,
    pub layout_style: LayoutStyle,
}

impl PageTheme {
    /// Inline style for the page container.
    #[must_use]
    pub fn container_style(&self) -> String {
        format!(
            "background-color: {}; color: {}; font-family: '{}', sans-serif;",
            self.background_color, self.text_color, self.font_family
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialButton {
    pub platform: SocialPlatform,
    pub label: &'static str,
    pub url: String,
}

/// Extra styling applied to every product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardDecoration {
    Plain,
    Shadow,
    Border { color: String },
}

impl CardDecoration {
    fn for_layout(layout: LayoutStyle, secondary_color: &str) -> Self {
        match layout {
            LayoutStyle::Modern => Self::Shadow,
            LayoutStyle::Elegant => Self::Border {
                color: secondary_color.to_string(),
            },
            _ => Self::Plain,
        }
    }

    /// Inline style for a card, empty for [`CardDecoration::Plain`].
    #[must_use]
    pub fn card_style(&self) -> String {
        match self {
            Self::Plain => String::new(),
            Self::Shadow => "box-shadow: 0 4px 14px rgba(0, 0, 0, 0.12);".to_string(),
            Self::Border { color } => format!("border: 1px solid {color};"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_featured: bool,
    /// Formatted price, e.g. `R$ 19.90`.
    pub price: Option<String>,
    /// Formatted original price; only present when it is higher than `price`.
    pub original_price: Option<String>,
    pub buy: Option<BuyAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyAction {
    pub label: String,
    pub url: String,
}

/// Lay out `vitrine` with `products` (already in display order) for `mode`.
#[must_use]
pub fn render(vitrine: &Vitrine, products: &[Product], mode: ViewportMode) -> Layout {
    let style = &vitrine.style;
    let theme = PageTheme {
        background_color: style.background_color.to_string(),
        primary_color: style.primary_color.to_string(),
        secondary_color: style.secondary_color.to_string(),
        text_color: style.text_color.to_string(),
        font_family: style.font_family.name().to_string(),
        layout_style: style.layout_style,
    };

    let social_links = vitrine
        .social_links
        .iter()
        .map(|(platform, value)| SocialButton {
            platform,
            label: platform.label(),
            url: platform.url_for(value),
        })
        .collect();

    Layout {
        mode,
        columns: columns(mode, products.len()),
        card_decoration: CardDecoration::for_layout(style.layout_style, &theme.secondary_color),
        theme,
        header: Header {
            title: vitrine.title.clone(),
            description: vitrine.description.clone(),
            avatar_url: vitrine.avatar_url.clone(),
        },
        social_links,
        cards: products.iter().map(card).collect(),
        is_empty: products.is_empty(),
        scoped_css: style.custom_css.scoped(),
    }
}

fn card(product: &Product) -> ProductCard {
    let data = &product.data;
    ProductCard {
        id: product.id,
        name: data.name.clone(),
        description: data.description.clone(),
        image_url: data.image_url.clone(),
        category: data.category.clone(),
        is_featured: data.is_featured,
        price: data.price.map(|p| p.display()),
        original_price: product
            .has_discount()
            .then(|| data.original_price.map(|p| p.display()))
            .flatten(),
        buy: data
            .external_link
            .as_ref()
            .filter(|link| !link.is_empty())
            .map(|link| BuyAction {
                label: data.button_text.clone(),
                url: link.clone(),
            }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::{NewVitrine, ProductFields};
    use crate::types::{Slug, SocialLinks, StyleOverrides, UserId, VitrineId};

    fn vitrine() -> Vitrine {
        Vitrine::from_new(
            VitrineId::generate(),
            UserId::generate(),
            NewVitrine {
                title: "Loja da Ana".to_string(),
                slug: Slug::parse("loja-da-ana").unwrap(),
                description: Some("Acessórios".to_string()),
            },
            Utc::now(),
        )
    }

    fn product(vitrine: &Vitrine, position: u32, fields: ProductFields) -> Product {
        Product {
            id: ProductId::generate(),
            vitrine_id: vitrine.id,
            data: fields.validate().unwrap(),
            position,
            created_at: Utc::now(),
        }
    }

    fn named(name: &str) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            ..ProductFields::default()
        }
    }

    fn products(v: &Vitrine, n: u32) -> Vec<Product> {
        (0..n).map(|i| product(v, i, named(&format!("p{i}")))).collect()
    }

    #[test]
    fn test_columns_by_mode_and_count() {
        let v = vitrine();
        assert_eq!(render(&v, &products(&v, 3), ViewportMode::Mobile).columns, 1);
        assert_eq!(render(&v, &products(&v, 3), ViewportMode::Desktop).columns, 2);
        assert_eq!(render(&v, &products(&v, 4), ViewportMode::Desktop).columns, 2);
        assert_eq!(render(&v, &products(&v, 5), ViewportMode::Desktop).columns, 3);
    }

    #[test]
    fn test_empty_state() {
        let v = vitrine();
        let layout = render(&v, &[], ViewportMode::Desktop);
        assert!(layout.is_empty);
        assert!(layout.cards.is_empty());
    }

    #[test]
    fn test_prices_and_strikethrough() {
        let v = vitrine();
        let discounted = product(
            &v,
            0,
            ProductFields {
                price: Some(Decimal::new(4990, 2)),
                original_price: Some(Decimal::new(7990, 2)),
                ..named("a")
            },
        );
        let inverted = product(
            &v,
            1,
            ProductFields {
                price: Some(Decimal::new(50, 0)),
                original_price: Some(Decimal::new(40, 0)),
                ..named("b")
            },
        );
        let layout = render(&v, &[discounted, inverted], ViewportMode::Mobile);
        assert_eq!(layout.cards[0].price.as_deref(), Some("R$ 49.90"));
        assert_eq!(layout.cards[0].original_price.as_deref(), Some("R$ 79.90"));
        assert_eq!(layout.cards[1].price.as_deref(), Some("R$ 50.00"));
        assert_eq!(layout.cards[1].original_price, None);
    }

    #[test]
    fn test_buy_action_only_with_link() {
        let v = vitrine();
        let linked = product(
            &v,
            0,
            ProductFields {
                external_link: Some("https://pay.example/x".to_string()),
                ..named("a")
            },
        );
        let custom = product(
            &v,
            1,
            ProductFields {
                external_link: Some("https://pay.example/y".to_string()),
                button_text: Some("Quero!".to_string()),
                ..named("b")
            },
        );
        let unlinked = product(&v, 2, named("c"));
        let layout = render(&v, &[linked, custom, unlinked], ViewportMode::Mobile);
        let buy = layout.cards[0].buy.as_ref().unwrap();
        assert_eq!(buy.label, "Comprar");
        assert_eq!(buy.url, "https://pay.example/x");
        assert_eq!(layout.cards[1].buy.as_ref().unwrap().label, "Quero!");
        assert!(layout.cards[2].buy.is_none());
    }

    #[test]
    fn test_social_links_in_platform_order_with_urls() {
        let mut v = vitrine();
        v.social_links = SocialLinks::new()
            .with(SocialPlatform::Email, "ana@loja.com")
            .with(SocialPlatform::Whatsapp, "+55 (11) 98888-7777")
            .with(SocialPlatform::Instagram, "@ana");
        let layout = render(&v, &[], ViewportMode::Mobile);
        let urls: Vec<_> = layout.social_links.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://instagram.com/ana",
                "https://wa.me/5511988887777",
                "mailto:ana@loja.com"
            ]
        );
    }

    #[test]
    fn test_card_decoration_per_layout() {
        let mut v = vitrine();
        assert_eq!(render(&v, &[], ViewportMode::Mobile).card_decoration, CardDecoration::Plain);
        v.style.layout_style = LayoutStyle::Modern;
        assert_eq!(render(&v, &[], ViewportMode::Mobile).card_decoration, CardDecoration::Shadow);
        v.style.layout_style = LayoutStyle::Elegant;
        let decoration = render(&v, &[], ViewportMode::Mobile).card_decoration;
        assert_eq!(
            decoration,
            CardDecoration::Border {
                color: "#666666".to_string()
            }
        );
        assert_eq!(decoration.card_style(), "border: 1px solid #666666;");
    }

    #[test]
    fn test_theme_and_scoped_css() {
        let mut v = vitrine();
        v.style.custom_css = StyleOverrides::parse("padding: 12px").unwrap();
        let layout = render(&v, &[], ViewportMode::Mobile);
        assert_eq!(
            layout.theme.container_style(),
            "background-color: #ffffff; color: #333333; font-family: 'Inter', sans-serif;"
        );
        assert_eq!(
            layout.scoped_css.as_deref(),
            Some(".vitrine-container { padding: 12px; }")
        );
        assert_eq!(layout.header.title, "Loja da Ana");
    }

    #[test]
    fn test_layout_serializes_for_json_preview() {
        let v = vitrine();
        let json = serde_json::to_value(render(&v, &products(&v, 1), ViewportMode::Desktop)).unwrap();
        assert_eq!(json["mode"], "desktop");
        assert_eq!(json["columns"], 2);
        assert_eq!(json["card_decoration"]["kind"], "plain");
        assert_eq!(json["cards"][0]["name"], "p0");
    }
}
