use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    models::{Competition, Stage},
};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    responses(
        (status = 200, description = "List all competitions successfully", body = Vec<Competition>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
) -> Result<Json<Vec<Competition>>, WebError> {
    let competitions = services::list_competitions(db.pool()).await?;

    Ok(Json(competitions))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}",
    params(
        ("slug" = String, Path, description = "Competition slug")
    ),
    responses(
        (status = 200, description = "Competition found", body = Competition),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let competition = services::get_competition_by_slug(db.pool(), &slug).await?;

    Ok(Json(competition).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/stages",
    params(
        ("slug" = String, Path, description = "Competition slug")
    ),
    responses(
        (status = 200, description = "Journey legs of the competition", body = Vec<Stage>),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn list_stages(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let stages = services::list_stages(db.pool(), &slug).await?;

    Ok(Json(stages).into_response())
}
