use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::event::{
        ApproveEntriesRequest, BatchApprovalResponse, BracketResponse, CreateEventRequest,
        EventListQuery, EventResponse, ProcessPhaseResponse, SeedTimeTrialRequest,
    },
    models::{Phase, RaceWithLanes},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventListQuery),
    responses(
        (status = 200, description = "Events of a competition", body = Vec<EventResponse>)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(db): State<Database>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventResponse>>, WebError> {
    let events = services::list_events(db.pool(), query.competition_id).await?;

    let response: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let event = services::get_event(db.pool(), event_id).await?;

    Ok(Json(EventResponse::from(event)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/bracket",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Races of the event keyed by phase", body = BracketResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_bracket(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let bracket = services::get_bracket(db.pool(), event_id).await?;

    Ok(Json(bracket).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid event definition"),
        (status = 409, description = "Event already exists for this slot")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(db): State<Database>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let event = services::create_event(db.pool(), &request).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/time-trial",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    request_body = SeedTimeTrialRequest,
    responses(
        (status = 201, description = "Time-trial heats created", body = Vec<RaceWithLanes>),
        (status = 409, description = "Time trial already seeded"),
        (status = 422, description = "One or more entries are not eligible")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn seed_time_trial(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<SeedTimeTrialRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let races = services::seed_time_trial(db.pool(), event_id, &request).await?;

    Ok((StatusCode::CREATED, Json(races)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/process/{phase}",
    params(
        ("id" = Uuid, Path, description = "Event id"),
        ("phase" = Phase, Path, description = "Phase to process")
    ),
    responses(
        (status = 200, description = "Phase processed and next races generated", body = ProcessPhaseResponse),
        (status = 409, description = "Phase not ready or already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn process_phase(
    State(db): State<Database>,
    Path((event_id, phase)): Path<(Uuid, Phase)>,
) -> Result<Response, WebError> {
    let outcome = services::process_phase(db.pool(), event_id, phase).await?;

    Ok(Json(outcome).into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/entries/approve",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    request_body = ApproveEntriesRequest,
    responses(
        (status = 200, description = "Per-entry approval outcome", body = BatchApprovalResponse),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn approve_entries(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<ApproveEntriesRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let outcome = services::approve_entries(db.pool(), event_id, &request).await?;

    Ok(Json(outcome).into_response())
}
