//! Product repository for database operations.
//!
//! Products have no owner column; every owner-scoped statement joins
//! `vitrine.vitrine` to check it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use vitrine_core::{Price, Product, ProductData, ProductId, UserId, VitrineId};

use super::RepositoryError;

const COLUMNS: &str = "p.id, p.vitrine_id, p.name, p.description, p.price, p.original_price, \
     p.image_url, p.external_link, p.button_text, p.category, p.is_featured, \
     p.stock_quantity, p.position, p.created_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    vitrine_id: Uuid,
    name: String,
    description: Option<String>,
    price: Option<Decimal>,
    original_price: Option<Decimal>,
    image_url: Option<String>,
    external_link: Option<String>,
    button_text: String,
    category: Option<String>,
    is_featured: bool,
    stock_quantity: Option<i32>,
    position: i32,
    created_at: DateTime<Utc>,
}

fn price(field: &str, amount: Option<Decimal>) -> Result<Option<Price>, RepositoryError> {
    amount
        .map(Price::new)
        .transpose()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid {field} in database: {e}")))
}

fn non_negative(field: &str, value: i32) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative {field} in database")))
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(row.id),
            vitrine_id: VitrineId::new(row.vitrine_id),
            data: ProductData {
                name: row.name,
                description: row.description,
                price: price("price", row.price)?,
                original_price: price("original_price", row.original_price)?,
                image_url: row.image_url,
                external_link: row.external_link,
                button_text: row.button_text,
                category: row.category,
                is_featured: row.is_featured,
                stock_quantity: row
                    .stock_quantity
                    .map(|n| non_negative("stock_quantity", n))
                    .transpose()?,
            },
            position: non_negative("position", row.position)?,
            created_at: row.created_at,
        })
    }
}

/// `INTEGER` columns hold at most `i32::MAX`.
fn to_column(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Products of a vitrine in display order.
    ///
    /// Does not check ownership; callers on the editor path check the vitrine
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_for_vitrine(
        &self,
        vitrine_id: VitrineId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM vitrine.product p \
             WHERE p.vitrine_id = $1 \
             ORDER BY p.position, p.created_at"
        ))
        .bind(vitrine_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a product into a vitrine owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vitrine does not belong to `owner`.
    #[instrument(skip(self, data), fields(name = %data.name))]
    pub async fn insert(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        data: &ProductData,
        position: u32,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO vitrine.product AS p \
                 (vitrine_id, name, description, price, original_price, image_url, \
                  external_link, button_text, category, is_featured, stock_quantity, position) \
             SELECT v.id, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13 \
             FROM vitrine.vitrine v \
             WHERE v.id = $1 AND v.owner_id = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(vitrine_id)
        .bind(owner)
        .bind(&data.name)
        .bind(data.description.as_deref())
        .bind(data.price.map(|p| p.amount()))
        .bind(data.original_price.map(|p| p.amount()))
        .bind(data.image_url.as_deref())
        .bind(data.external_link.as_deref())
        .bind(&data.button_text)
        .bind(data.category.as_deref())
        .bind(data.is_featured)
        .bind(data.stock_quantity.map(to_column))
        .bind(to_column(position))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Product::try_from(row)
    }

    /// Replace a product's fields, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in a vitrine
    /// owned by `owner`.
    #[instrument(skip(self, data))]
    pub async fn update(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
        data: &ProductData,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE vitrine.product p SET \
                 name = $4, description = $5, price = $6, original_price = $7, \
                 image_url = $8, external_link = $9, button_text = $10, category = $11, \
                 is_featured = $12, stock_quantity = $13, updated_at = NOW() \
             FROM vitrine.vitrine v \
             WHERE p.id = $1 AND p.vitrine_id = $2 AND v.id = p.vitrine_id AND v.owner_id = $3 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(vitrine_id)
        .bind(owner)
        .bind(&data.name)
        .bind(data.description.as_deref())
        .bind(data.price.map(|p| p.amount()))
        .bind(data.original_price.map(|p| p.amount()))
        .bind(data.image_url.as_deref())
        .bind(data.external_link.as_deref())
        .bind(&data.button_text)
        .bind(data.category.as_deref())
        .bind(data.is_featured)
        .bind(data.stock_quantity.map(to_column))
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Product::try_from(row)
    }

    /// Delete a product from a vitrine owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing was deleted.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        owner: UserId,
        vitrine_id: VitrineId,
        id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM vitrine.product p
            USING vitrine.vitrine v
            WHERE p.id = $1 AND p.vitrine_id = $2 AND v.id = p.vitrine_id AND v.owner_id = $3
            ",
        )
        .bind(id)
        .bind(vitrine_id)
        .bind(owner)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            vitrine_id: Uuid::new_v4(),
            name: "Camiseta".to_string(),
            description: None,
            price: Some(Decimal::new(4990, 2)),
            original_price: None,
            image_url: None,
            external_link: Some("https://pay.example/x".to_string()),
            button_text: "Comprar".to_string(),
            category: None,
            is_featured: true,
            stock_quantity: Some(3),
            position: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let product = Product::try_from(row()).unwrap();
        assert_eq!(product.position, 2);
        assert_eq!(product.data.stock_quantity, Some(3));
        assert_eq!(product.data.price.unwrap().display(), "R$ 49.90");
    }

    #[test]
    fn test_row_conversion_rejects_negative_values() {
        let negative_price = ProductRow {
            price: Some(Decimal::new(-1, 0)),
            ..row()
        };
        assert!(matches!(
            Product::try_from(negative_price),
            Err(RepositoryError::DataCorruption(_))
        ));
        let negative_position = ProductRow {
            position: -1,
            ..row()
        };
        assert!(matches!(
            Product::try_from(negative_position),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_to_column_saturates() {
        assert_eq!(to_column(7), 7);
        assert_eq!(to_column(u32::MAX), i32::MAX);
    }
}
