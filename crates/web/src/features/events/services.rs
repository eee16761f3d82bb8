use sqlx::PgPool;
use storage::{
    dto::event::{
        ApproveEntriesRequest, BatchApprovalResponse, BracketResponse, CreateEventRequest,
        EventResponse, ProcessPhaseResponse, SeedTimeTrialRequest,
    },
    error::{Result, StorageError},
    models::{Event, Phase, RaceWithLanes},
    repository::{
        competition::CompetitionRepository,
        entry::EntryRepository,
        event::EventRepository,
        race::{self, RaceRepository},
        reference::ReferenceRepository,
    },
    services::progression,
};
use uuid::Uuid;

pub async fn list_events(pool: &PgPool, competition_id: Uuid) -> Result<Vec<Event>> {
    let repo = EventRepository::new(pool);
    repo.list_by_competition(competition_id).await
}

pub async fn get_event(pool: &PgPool, event_id: Uuid) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.find_by_id(event_id).await
}

/// Create an event after resolving its reference data: the stage must belong
/// to the competition and the gender must fit both the category scope and
/// the boat class.
pub async fn create_event(pool: &PgPool, request: &CreateEventRequest) -> Result<Event> {
    let stage = CompetitionRepository::new(pool)
        .find_stage(request.stage_id)
        .await?;
    if stage.competition_id != request.competition_id {
        return Err(StorageError::validation(
            "stage does not belong to the given competition",
        ));
    }

    let reference = ReferenceRepository::new(pool);
    let category = reference.find_category(request.category_id).await?;
    if !category.gender.admits(request.gender) {
        return Err(StorageError::validation(format!(
            "category {} does not admit {} events",
            category.code, request.gender
        )));
    }
    let boat_class = reference.find_boat_class(request.boat_class_id).await?;
    if !boat_class.gender_scope.admits(request.gender) {
        return Err(StorageError::validation(format!(
            "boat class {} does not admit {} events",
            boat_class.code, request.gender
        )));
    }
    if request.has_repechage && request.time_trial_to_repechage == 0 {
        return Err(StorageError::validation(
            "a repechage needs time_trial_to_repechage > 0",
        ));
    }

    let repo = EventRepository::new(pool);
    repo.create(request).await
}

pub async fn get_bracket(pool: &PgPool, event_id: Uuid) -> Result<BracketResponse> {
    let event = EventRepository::new(pool).find_by_id(event_id).await?;
    let details = RaceRepository::new(pool).details_for_event(event_id).await?;

    Ok(BracketResponse {
        event: EventResponse::from(event),
        phases: race::group_by_phase(details),
    })
}

pub async fn seed_time_trial(
    pool: &PgPool,
    event_id: Uuid,
    request: &SeedTimeTrialRequest,
) -> Result<Vec<RaceWithLanes>> {
    progression::seed_time_trial(pool, event_id, &request.entry_ids).await
}

pub async fn process_phase(
    pool: &PgPool,
    event_id: Uuid,
    phase: Phase,
) -> Result<ProcessPhaseResponse> {
    progression::process_phase(pool, event_id, phase).await
}

pub async fn approve_entries(
    pool: &PgPool,
    event_id: Uuid,
    request: &ApproveEntriesRequest,
) -> Result<BatchApprovalResponse> {
    let event = EventRepository::new(pool).find_by_id(event_id).await?;
    let boat_class = ReferenceRepository::new(pool)
        .find_boat_class(event.boat_class_id)
        .await?;

    let repo = EntryRepository::new(pool);
    repo.approve_batch(&event, &boat_class, &request.entry_ids)
        .await
}
