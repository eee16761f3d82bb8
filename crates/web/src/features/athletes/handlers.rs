use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{athlete::AthleteListQuery, common::PaginatedResponse},
    models::Athlete,
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/athletes",
    params(AthleteListQuery),
    responses(
        (status = 200, description = "Licensed athletes", body = PaginatedResponse<Athlete>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "athletes"
)]
pub async fn list_athletes(
    State(db): State<Database>,
    Query(query): Query<AthleteListQuery>,
) -> Result<Response, WebError> {
    query.pagination.validate().map_err(WebError::BadRequest)?;

    let (athletes, total_items) = services::list_athletes(db.pool(), &query).await?;

    let response = PaginatedResponse::new(
        athletes,
        query.pagination.page,
        query.pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/athletes/{id}",
    params(
        ("id" = Uuid, Path, description = "Athlete id")
    ),
    responses(
        (status = 200, description = "Athlete found", body = Athlete),
        (status = 404, description = "Athlete not found")
    ),
    tag = "athletes"
)]
pub async fn get_athlete(
    State(db): State<Database>,
    Path(athlete_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let athlete = services::get_athlete(db.pool(), athlete_id).await?;

    Ok(Json(athlete).into_response())
}
