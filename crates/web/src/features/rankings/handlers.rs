use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::ranking::{CreateRankingSystemRequest, RankingQuery, RankingsResponse},
    models::RankingSystem,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/rankings",
    params(
        ("slug" = String, Path, description = "Competition slug"),
        RankingQuery
    ),
    responses(
        (status = 200, description = "Grouped standings for the requested ranking system", body = RankingsResponse),
        (status = 404, description = "Competition or ranking system not found"),
        (status = 500, description = "Competition data is inconsistent; rankings withheld")
    ),
    tag = "rankings"
)]
pub async fn get_rankings(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Result<Response, WebError> {
    let rankings = services::get_rankings(db.pool(), &slug, &query).await?;

    Ok(Json(rankings).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/ranking-systems",
    params(
        ("slug" = String, Path, description = "Competition slug")
    ),
    responses(
        (status = 200, description = "Ranking systems available to this competition", body = Vec<RankingSystem>),
        (status = 404, description = "Competition not found")
    ),
    tag = "rankings"
)]
pub async fn list_ranking_systems(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let systems = services::list_ranking_systems(db.pool(), &slug).await?;

    Ok(Json(systems).into_response())
}

#[utoipa::path(
    post,
    path = "/api/ranking-systems",
    request_body = CreateRankingSystemRequest,
    responses(
        (status = 201, description = "Ranking system created", body = RankingSystem),
        (status = 400, description = "Invalid configuration"),
        (status = 409, description = "A ranking system with this name already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "rankings"
)]
pub async fn create_ranking_system(
    State(db): State<Database>,
    Json(request): Json<CreateRankingSystemRequest>,
) -> Result<Response, WebError> {
    request.validate()?;
    request
        .validate_semantics()
        .map_err(WebError::BadRequest)?;

    let system = services::create_ranking_system(db.pool(), &request).await?;

    Ok((StatusCode::CREATED, Json(system)).into_response())
}
