use sqlx::PgPool;
use storage::{
    dto::ranking::{CreateRankingSystemRequest, RankingQuery, RankingsResponse},
    error::Result,
    models::RankingSystem,
    repository::{competition::CompetitionRepository, ranking::RankingRepository},
    services::ranking,
};

/// Compute standings for one competition under the given ranking system.
pub async fn get_rankings(
    pool: &PgPool,
    slug: &str,
    query: &RankingQuery,
) -> Result<RankingsResponse> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;

    ranking::rankings_for_competition(
        pool,
        competition.competition_id,
        query.system_id,
        query.include_masters,
    )
    .await
}

/// Ranking systems usable for a competition.
pub async fn list_ranking_systems(pool: &PgPool, slug: &str) -> Result<Vec<RankingSystem>> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;

    let repo = RankingRepository::new(pool);
    repo.list_systems(competition.competition_id).await
}

/// Create a new administrator-defined ranking system.
pub async fn create_ranking_system(
    pool: &PgPool,
    request: &CreateRankingSystemRequest,
) -> Result<RankingSystem> {
    let repo = RankingRepository::new(pool);
    repo.create_system(request).await
}
