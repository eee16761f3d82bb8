use sqlx::PgPool;
use storage::{
    error::Result,
    models::{Competition, Stage},
    repository::competition::CompetitionRepository,
};

/// List all competitions
pub async fn list_competitions(pool: &PgPool) -> Result<Vec<Competition>> {
    let repo = CompetitionRepository::new(pool);
    repo.list().await
}

/// Get competition by slug
pub async fn get_competition_by_slug(pool: &PgPool, slug: &str) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_slug(slug).await
}

/// Journey legs of a competition in running order
pub async fn list_stages(pool: &PgPool, slug: &str) -> Result<Vec<Stage>> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.find_by_slug(slug).await?;
    repo.list_stages(competition.competition_id).await
}
