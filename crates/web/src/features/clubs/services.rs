use sqlx::PgPool;
use storage::{error::Result, models::Club, repository::club::ClubRepository};

pub async fn list_clubs(pool: &PgPool) -> Result<Vec<Club>> {
    let repo = ClubRepository::new(pool);
    repo.list().await
}
