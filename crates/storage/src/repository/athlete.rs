use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::error::{Result, StorageError};
use crate::models::Athlete;

const ATHLETE_COLUMNS: &str =
    "athlete_id, first_name, last_name, gender, birth_date, club_id, active, created_at";

/// Repository for Athlete database operations (read-only reference data)
pub struct AthleteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AthleteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        pagination: &PaginationParams,
        club_id: Option<Uuid>,
    ) -> Result<(Vec<Athlete>, i64)> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM athletes WHERE 1=1");
        if let Some(club_id) = club_id {
            count_query.push(" AND club_id = ");
            count_query.push_bind(club_id);
        }
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes WHERE 1=1"
        ));
        if let Some(club_id) = club_id {
            query.push(" AND club_id = ");
            query.push_bind(club_id);
        }
        query.push(" ORDER BY last_name, first_name LIMIT ");
        query.push_bind(pagination.limit() as i64);
        query.push(" OFFSET ");
        query.push_bind(pagination.offset() as i64);

        let athletes: Vec<Athlete> = query.build_query_as().fetch_all(self.pool).await?;
        Ok((athletes, total))
    }

    pub async fn find_by_id(&self, athlete_id: Uuid) -> Result<Athlete> {
        let query = format!("SELECT {ATHLETE_COLUMNS} FROM athletes WHERE athlete_id = $1");
        sqlx::query_as::<_, Athlete>(&query)
            .bind(athlete_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}
