use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::race::{RaceDetail, RecordResultsRequest},
    models::RaceWithLanes,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/races/{id}",
    params(
        ("id" = Uuid, Path, description = "Race id")
    ),
    responses(
        (status = 200, description = "Race with lanes and entrants", body = RaceDetail),
        (status = 404, description = "Race not found")
    ),
    tag = "races"
)]
pub async fn get_race(
    State(db): State<Database>,
    Path(race_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let race = services::get_race(db.pool(), race_id).await?;

    Ok(Json(race).into_response())
}

#[utoipa::path(
    post,
    path = "/api/races/{id}/results",
    params(
        ("id" = Uuid, Path, description = "Race id")
    ),
    request_body = RecordResultsRequest,
    responses(
        (status = 200, description = "Results recorded and race completed", body = RaceWithLanes),
        (status = 400, description = "Result set does not match the scheduled lanes"),
        (status = 409, description = "Race already completed")
    ),
    security(("bearer_auth" = [])),
    tag = "races"
)]
pub async fn record_results(
    State(db): State<Database>,
    Path(race_id): Path<Uuid>,
    Json(request): Json<RecordResultsRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let race = services::record_results(db.pool(), race_id, &request).await?;

    Ok(Json(race).into_response())
}
