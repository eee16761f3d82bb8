use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Competition, Stage};

const COMPETITION_COLUMNS: &str =
    "competition_id, name, slug, status, venue, start_date, end_date, created_at";

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions, most recent first
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let query = format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions ORDER BY start_date DESC, created_at DESC"
        );
        Ok(sqlx::query_as::<_, Competition>(&query)
            .fetch_all(self.pool)
            .await?)
    }

    /// Get a competition by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Competition> {
        let query = format!("SELECT {COMPETITION_COLUMNS} FROM competitions WHERE slug = $1");
        sqlx::query_as::<_, Competition>(&query)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn find_by_id(&self, competition_id: Uuid) -> Result<Competition> {
        let query =
            format!("SELECT {COMPETITION_COLUMNS} FROM competitions WHERE competition_id = $1");
        sqlx::query_as::<_, Competition>(&query)
            .bind(competition_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Journey legs of a competition in running order
    pub async fn list_stages(&self, competition_id: Uuid) -> Result<Vec<Stage>> {
        Ok(sqlx::query_as::<_, Stage>(
            r#"
            SELECT stage_id, competition_id, number, name, scheduled_date
            FROM stages
            WHERE competition_id = $1
            ORDER BY number
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?)
    }

    pub async fn find_stage(&self, stage_id: Uuid) -> Result<Stage> {
        sqlx::query_as::<_, Stage>(
            r#"
            SELECT stage_id, competition_id, number, name, scheduled_date
            FROM stages
            WHERE stage_id = $1
            "#,
        )
        .bind(stage_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
