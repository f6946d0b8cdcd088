//! Domain entities: vitrines, their products and visit counters.
//!
//! Input types ([`VitrineChanges`], [`ProductFields`]) carry what a form
//! submitted; the entity types carry what the store holds.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    FontFamily, HexColor, LayoutStyle, Price, PriceError, ProductId, Slug, SocialLinks,
    StyleAttributes, StyleOverrides, UserId, VitrineId,
};

/// Default label of a product's buy action.
pub const DEFAULT_BUTTON_TEXT: &str = "Comprar";

/// Errors raised while validating form input, before anything is written.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name is required")]
    EmptyProductName,
    #[error("vitrine title is required")]
    EmptyTitle,
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Vitrine
// =============================================================================

/// A user's public storefront page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitrine {
    pub id: VitrineId,
    pub owner: UserId,
    pub title: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub style: StyleAttributes,
    pub social_links: SocialLinks,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Vitrine {
    /// Build a freshly inserted vitrine from its creation input.
    #[must_use]
    pub fn from_new(id: VitrineId, owner: UserId, new: NewVitrine, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            title: new.title,
            slug: new.slug,
            description: new.description,
            avatar_url: None,
            style: StyleAttributes::default(),
            social_links: SocialLinks::default(),
            seo_title: None,
            seo_description: None,
            is_published: false,
            created_at,
        }
    }

    /// Merge a change set into this vitrine. Fields left `None` are untouched.
    pub fn apply(&mut self, changes: &VitrineChanges) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(slug) = &changes.slug {
            self.slug = slug.clone();
        }
        if let Some(description) = &changes.description {
            self.description = non_blank(Some(description.clone()));
        }
        if let Some(avatar_url) = &changes.avatar_url {
            self.avatar_url = non_blank(Some(avatar_url.clone()));
        }
        if let Some(color) = &changes.background_color {
            self.style.background_color = color.clone();
        }
        if let Some(color) = &changes.primary_color {
            self.style.primary_color = color.clone();
        }
        if let Some(color) = &changes.secondary_color {
            self.style.secondary_color = color.clone();
        }
        if let Some(color) = &changes.text_color {
            self.style.text_color = color.clone();
        }
        if let Some(font) = changes.font_family {
            self.style.font_family = font;
        }
        if let Some(layout) = changes.layout_style {
            self.style.layout_style = layout;
        }
        if let Some(css) = &changes.custom_css {
            self.style.custom_css = css.clone();
        }
        if let Some(links) = &changes.social_links {
            self.social_links = links.clone();
        }
        if let Some(seo_title) = &changes.seo_title {
            self.seo_title = non_blank(Some(seo_title.clone()));
        }
        if let Some(seo_description) = &changes.seo_description {
            self.seo_description = non_blank(Some(seo_description.clone()));
        }
        if let Some(published) = changes.is_published {
            self.is_published = published;
        }
    }

    /// Public page URL under `origin`.
    #[must_use]
    pub fn public_url(&self, origin: &str) -> String {
        self.slug.public_url(origin)
    }

    /// Metadata for link previews of the public page.
    #[must_use]
    pub fn share_preview(&self, origin: &str) -> SharePreview {
        SharePreview {
            title: self.seo_title.clone().unwrap_or_else(|| self.title.clone()),
            description: self
                .seo_description
                .clone()
                .or_else(|| self.description.clone()),
            image: self.avatar_url.clone(),
            url: self.public_url(origin),
        }
    }
}

/// Input for creating a vitrine. Everything else starts at its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVitrine {
    pub title: String,
    pub slug: Slug,
    pub description: Option<String>,
}

impl NewVitrine {
    pub const PLACEHOLDER_TITLE: &'static str = "Nova Vitrine";
    pub const PLACEHOLDER_DESCRIPTION: &'static str = "Sua vitrine personalizada está quase pronta!";

    /// The vitrine the dashboard creates with one click.
    ///
    /// The slug is `vitrine-<unix millis>-<8 random hex digits>`; the suffix
    /// keeps two owners creating in the same millisecond apart.
    #[must_use]
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        let millis = now.timestamp_millis().unsigned_abs();
        let suffix: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect();
        Self {
            title: Self::PLACEHOLDER_TITLE.to_string(),
            slug: Slug::new_unchecked(format!("vitrine-{millis}-{suffix}")),
            description: Some(Self::PLACEHOLDER_DESCRIPTION.to_string()),
        }
    }
}

/// A partial update of a vitrine, as submitted by the editor.
///
/// Blank strings clear optional text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VitrineChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Slug>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_style: Option<LayoutStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<StyleOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl VitrineChanges {
    #[must_use]
    pub fn publish(is_published: bool) -> Self {
        Self {
            is_published: Some(is_published),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether applying this change set would move the vitrine to a new slug.
    #[must_use]
    pub fn changes_slug(&self, current: &Slug) -> bool {
        self.slug.as_ref().is_some_and(|slug| slug != current)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if a blank title was submitted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item shown on a vitrine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub vitrine_id: VitrineId,
    #[serde(flatten)]
    pub data: ProductData,
    /// Insertion order. Assigned once from the product count and never
    /// renumbered, so gaps and repeats are possible after deletions.
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the original price should be shown struck through.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        matches!(
            (self.data.price, self.data.original_price),
            (Some(price), Some(original)) if original > price
        )
    }
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub original_price: Option<Price>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub button_text: String,
    pub category: Option<String>,
    pub is_featured: bool,
    pub stock_quantity: Option<u32>,
}

/// Product form input, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub external_link: Option<String>,
    pub button_text: Option<String>,
    pub category: Option<String>,
    pub is_featured: bool,
    pub stock_quantity: Option<i64>,
}

impl ProductFields {
    /// Check and normalize the form.
    ///
    /// Blank strings become `None`, zero prices and stock become `None`, and a
    /// missing button label becomes [`DEFAULT_BUTTON_TEXT`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a blank name or negative numbers.
    pub fn validate(self) -> Result<ProductData, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyProductName);
        }

        let price = optional_price(self.price, "price")?;
        let original_price = optional_price(self.original_price, "original_price")?;
        let stock_quantity = match self.stock_quantity {
            None | Some(0) => None,
            Some(n) if n < 0 => {
                return Err(ValidationError::Negative {
                    field: "stock_quantity",
                });
            }
            Some(n) => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        };

        Ok(ProductData {
            name,
            description: non_blank(self.description),
            price,
            original_price,
            image_url: non_blank(self.image_url),
            external_link: non_blank(self.external_link),
            button_text: non_blank(self.button_text)
                .unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string()),
            category: non_blank(self.category),
            is_featured: self.is_featured,
            stock_quantity,
        })
    }
}

fn optional_price(
    amount: Option<Decimal>,
    field: &'static str,
) -> Result<Option<Price>, ValidationError> {
    match amount {
        None => Ok(None),
        Some(amount) => {
            Price::positive(amount).map_err(|PriceError::Negative| ValidationError::Negative { field })
        }
    }
}

// =============================================================================
// Analytics & dashboard
// =============================================================================

/// Visit counter of a vitrine's public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitrineAnalytics {
    pub vitrine_id: VitrineId,
    pub visits_count: i64,
    pub last_visit: Option<DateTime<Utc>>,
}

/// Totals shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_vitrines: usize,
    pub published: usize,
    pub total_views: i64,
}

impl DashboardSummary {
    #[must_use]
    pub fn compute(vitrines: &[Vitrine], analytics: &[VitrineAnalytics]) -> Self {
        Self {
            total_vitrines: vitrines.len(),
            published: vitrines.iter().filter(|v| v.is_published).count(),
            total_views: analytics.iter().map(|a| a.visits_count).sum(),
        }
    }
}

/// Link preview metadata for a public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePreview {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: String,
}

/// What the public read path returns: a published vitrine and its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedVitrine {
    pub vitrine: Vitrine,
    pub products: Vec<Product>,
}
