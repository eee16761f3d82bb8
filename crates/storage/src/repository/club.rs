use sqlx::PgPool;

use crate::error::Result;
use crate::models::Club;

/// Repository for Club database operations (read-only reference data)
pub struct ClubRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClubRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Club>> {
        Ok(sqlx::query_as::<_, Club>(
            "SELECT club_id, short_code, name, created_at FROM clubs ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?)
    }
}
