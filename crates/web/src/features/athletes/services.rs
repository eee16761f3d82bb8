use sqlx::PgPool;
use storage::{
    dto::athlete::AthleteListQuery,
    error::Result,
    models::Athlete,
    repository::athlete::AthleteRepository,
};
use uuid::Uuid;

/// List athletes with optional club filtering and pagination
pub async fn list_athletes(
    pool: &PgPool,
    query: &AthleteListQuery,
) -> Result<(Vec<Athlete>, i64)> {
    let repo = AthleteRepository::new(pool);
    repo.list(&query.pagination, query.club_id).await
}

pub async fn get_athlete(pool: &PgPool, athlete_id: Uuid) -> Result<Athlete> {
    let repo = AthleteRepository::new(pool);
    repo.find_by_id(athlete_id).await
}
