//! Visit counters of public pages.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use vitrine_core::{UserId, VitrineAnalytics, VitrineId};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct AnalyticsRow {
    vitrine_id: Uuid,
    visits_count: i64,
    last_visit: Option<DateTime<Utc>>,
}

impl From<AnalyticsRow> for VitrineAnalytics {
    fn from(row: AnalyticsRow) -> Self {
        Self {
            vitrine_id: VitrineId::new(row.vitrine_id),
            visits_count: row.visits_count,
            last_visit: row.last_visit,
        }
    }
}

/// Repository for `vitrine.vitrine_analytics`.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count one visit, creating the counter on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn record_visit(&self, vitrine_id: VitrineId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO vitrine.vitrine_analytics (vitrine_id, visits_count, last_visit)
            VALUES ($1, 1, NOW())
            ON CONFLICT (vitrine_id) DO UPDATE
            SET visits_count = vitrine_analytics.visits_count + 1,
                last_visit = NOW()
            ",
        )
        .bind(vitrine_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Counters of every vitrine owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<VitrineAnalytics>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnalyticsRow>(
            r"
            SELECT a.vitrine_id, a.visits_count, a.last_visit
            FROM vitrine.vitrine_analytics a
            JOIN vitrine.vitrine v ON v.id = a.vitrine_id
            WHERE v.owner_id = $1
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(VitrineAnalytics::from).collect())
    }
}
