//! Vitrine repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use vitrine_core::{
    FontFamily, HexColor, LayoutStyle, NewVitrine, Slug, SocialLinks, StyleAttributes,
    StyleOverrides, UserId, Vitrine, VitrineChanges, VitrineId,
};

use super::{RepositoryError, non_blank};

const COLUMNS: &str = "id, owner_id, title, slug, description, avatar_url, \
     background_color, primary_color, secondary_color, text_color, \
     font_family, layout_style, custom_css, social_links, \
     seo_title, seo_description, is_published, created_at";

#[derive(sqlx::FromRow)]
struct VitrineRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    slug: String,
    description: Option<String>,
    avatar_url: Option<String>,
    background_color: String,
    primary_color: String,
    secondary_color: String,
    text_color: String,
    font_family: String,
    layout_style: String,
    custom_css: String,
    social_links: serde_json::Value,
    seo_title: Option<String>,
    seo_description: Option<String>,
    is_published: bool,
    created_at: DateTime<Utc>,
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("invalid {field} in database: {err}"))
}

fn color(field: &str, value: &str) -> Result<HexColor, RepositoryError> {
    HexColor::parse(value).map_err(|e| corrupt(field, e))
}

impl TryFrom<VitrineRow> for Vitrine {
    type Error = RepositoryError;

    fn try_from(row: VitrineRow) -> Result<Self, Self::Error> {
        let style = StyleAttributes {
            background_color: color("background_color", &row.background_color)?,
            primary_color: color("primary_color", &row.primary_color)?,
            secondary_color: color("secondary_color", &row.secondary_color)?,
            text_color: color("text_color", &row.text_color)?,
            font_family: row
                .font_family
                .parse::<FontFamily>()
                .map_err(|e| corrupt("font_family", e))?,
            layout_style: row
                .layout_style
                .parse::<LayoutStyle>()
                .map_err(|e| corrupt("layout_style", e))?,
            custom_css: StyleOverrides::parse(&row.custom_css)
                .map_err(|e| corrupt("custom_css", e))?,
        };
        let social_links: SocialLinks =
            serde_json::from_value(row.social_links).map_err(|e| corrupt("social_links", e))?;

        Ok(Self {
            id: VitrineId::new(row.id),
            owner: UserId::new(row.owner_id),
            title: row.title,
            slug: Slug::parse(&row.slug).map_err(|e| corrupt("slug", e))?,
            description: row.description,
            avatar_url: row.avatar_url,
            style,
            social_links,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            is_published: row.is_published,
            created_at: row.created_at,
        })
    }
}

/// Repository for vitrine database operations.
///
/// Every query that takes an owner filters by it, so a foreign vitrine looks
/// exactly like a missing one.
pub struct VitrineRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VitrineRepository<'a> {
    /// Create a new vitrine repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List an owner's vitrines, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Vitrine>, RepositoryError> {
        let rows = sqlx::query_as::<_, VitrineRow>(&format!(
            "SELECT {COLUMNS} FROM vitrine.vitrine WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Vitrine::try_from).collect()
    }

    /// Get a vitrine owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such vitrine belongs to `owner`.
    #[instrument(skip(self))]
    pub async fn get(&self, owner: UserId, id: VitrineId) -> Result<Vitrine, RepositoryError> {
        let row = sqlx::query_as::<_, VitrineRow>(&format!(
            "SELECT {COLUMNS} FROM vitrine.vitrine WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Vitrine::try_from(row)
    }

    /// Get a published vitrine by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_published(&self, slug: &Slug) -> Result<Option<Vitrine>, RepositoryError> {
        let row = sqlx::query_as::<_, VitrineRow>(&format!(
            "SELECT {COLUMNS} FROM vitrine.vitrine WHERE slug = $1 AND is_published"
        ))
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Vitrine::try_from).transpose()
    }

    /// Whether `owner` owns vitrine `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_owned_by(&self, owner: UserId, id: VitrineId) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM vitrine.vitrine WHERE id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a vitrine with default style.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    #[instrument(skip(self, new), fields(slug = %new.slug))]
    pub async fn create(&self, owner: UserId, new: &NewVitrine) -> Result<Vitrine, RepositoryError> {
        let row = sqlx::query_as::<_, VitrineRow>(&format!(
            "INSERT INTO vitrine.vitrine (owner_id, title, slug, description) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(&new.title)
        .bind(new.slug.as_str())
        .bind(new.description.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "slug already taken"))?;

        Vitrine::try_from(row)
    }

    /// Write the fields present in `changes`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such vitrine belongs to `owner`.
    /// Returns `RepositoryError::Conflict` if the new slug is taken.
    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        owner: UserId,
        id: VitrineId,
        changes: &VitrineChanges,
    ) -> Result<(), RepositoryError> {
        let mut query = update_query(changes);
        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" AND owner_id = ");
        query.push_bind(owner);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_write(e, "slug already taken"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a vitrine; products and analytics cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such vitrine belongs to `owner`.
    #[instrument(skip(self))]
    pub async fn delete(&self, owner: UserId, id: VitrineId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM vitrine.vitrine WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// `UPDATE ... SET` for the fields present in `changes`.
///
/// `updated_at` is always set, so an empty change set still matches the row.
fn update_query(changes: &VitrineChanges) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::new("UPDATE vitrine.vitrine SET updated_at = NOW()");

    if let Some(title) = &changes.title {
        query.push(", title = ").push_bind(title.trim());
    }
    if let Some(slug) = &changes.slug {
        query.push(", slug = ").push_bind(slug.as_str());
    }
    if let Some(description) = &changes.description {
        query
            .push(", description = ")
            .push_bind(non_blank(Some(description.as_str())));
    }
    if let Some(avatar_url) = &changes.avatar_url {
        query
            .push(", avatar_url = ")
            .push_bind(non_blank(Some(avatar_url.as_str())));
    }
    if let Some(color) = &changes.background_color {
        query.push(", background_color = ").push_bind(color.as_str());
    }
    if let Some(color) = &changes.primary_color {
        query.push(", primary_color = ").push_bind(color.as_str());
    }
    if let Some(color) = &changes.secondary_color {
        query.push(", secondary_color = ").push_bind(color.as_str());
    }
    if let Some(color) = &changes.text_color {
        query.push(", text_color = ").push_bind(color.as_str());
    }
    if let Some(font) = changes.font_family {
        query.push(", font_family = ").push_bind(font.name());
    }
    if let Some(layout) = changes.layout_style {
        query.push(", layout_style = ").push_bind(layout.key());
    }
    if let Some(css) = &changes.custom_css {
        query
            .push(", custom_css = ")
            .push_bind(css.to_declaration_list());
    }
    if let Some(links) = &changes.social_links {
        query
            .push(", social_links = ")
            .push_bind(sqlx::types::Json(links));
    }
    if let Some(seo_title) = &changes.seo_title {
        query
            .push(", seo_title = ")
            .push_bind(non_blank(Some(seo_title.as_str())));
    }
    if let Some(seo_description) = &changes.seo_description {
        query
            .push(", seo_description = ")
            .push_bind(non_blank(Some(seo_description.as_str())));
    }
    if let Some(published) = changes.is_published {
        query.push(", is_published = ").push_bind(published);
    }

    query
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_query_only_sets_present_fields() {
        let changes = VitrineChanges {
            title: Some("Nova".to_string()),
            is_published: Some(true),
            ..VitrineChanges::default()
        };
        let sql = update_query(&changes).into_sql();
        assert_eq!(
            sql,
            "UPDATE vitrine.vitrine SET updated_at = NOW(), title = $1, is_published = $2"
        );
    }

    #[test]
    fn test_update_query_empty_changes() {
        let sql = update_query(&VitrineChanges::default()).into_sql();
        assert_eq!(sql, "UPDATE vitrine.vitrine SET updated_at = NOW()");
    }

    #[test]
    fn test_row_conversion_rejects_corrupt_color() {
        let row = VitrineRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Loja".to_string(),
            slug: "loja".to_string(),
            description: None,
            avatar_url: None,
            background_color: "red".to_string(),
            primary_color: "#000000".to_string(),
            secondary_color: "#666666".to_string(),
            text_color: "#333333".to_string(),
            font_family: "Inter".to_string(),
            layout_style: "minimal".to_string(),
            custom_css: String::new(),
            social_links: serde_json::json!({}),
            seo_title: None,
            seo_description: None,
            is_published: false,
            created_at: Utc::now(),
        };
        assert!(matches!(
            Vitrine::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_conversion_reads_defaults() {
        let row = VitrineRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Loja".to_string(),
            slug: "loja".to_string(),
            description: Some("Oi".to_string()),
            avatar_url: None,
            background_color: "#ffffff".to_string(),
            primary_color: "#000000".to_string(),
            secondary_color: "#666666".to_string(),
            text_color: "#333333".to_string(),
            font_family: "Playfair Display".to_string(),
            layout_style: "influencer".to_string(),
            custom_css: "padding: 4px;".to_string(),
            social_links: serde_json::json!({"instagram": "@loja"}),
            seo_title: None,
            seo_description: None,
            is_published: true,
            created_at: Utc::now(),
        };
        let vitrine = Vitrine::try_from(row).unwrap();
        assert_eq!(vitrine.style.font_family, FontFamily::PlayfairDisplay);
        assert_eq!(vitrine.style.layout_style, LayoutStyle::Influencer);
        assert_eq!(vitrine.social_links.len(), 1);
        assert!(!vitrine.style.custom_css.is_empty());
    }
}
