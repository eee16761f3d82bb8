use sqlx::PgPool;
use storage::{
    dto::race::{RaceDetail, RecordResultsRequest},
    error::Result,
    models::RaceWithLanes,
    repository::race::RaceRepository,
    services::results,
};
use uuid::Uuid;

pub async fn get_race(pool: &PgPool, race_id: Uuid) -> Result<RaceDetail> {
    let repo = RaceRepository::new(pool);
    repo.find_detail(race_id).await
}

pub async fn record_results(
    pool: &PgPool,
    race_id: Uuid,
    request: &RecordResultsRequest,
) -> Result<RaceWithLanes> {
    results::record_race_results(pool, race_id, request).await
}
