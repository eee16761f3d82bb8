use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::race::RaceDetail;
use crate::models::{Event, EventStatus, Gender, Medals, Phase};

/// Request payload for creating an event (one boat class × category × gender
/// slot within a competition stage) together with its progression rules.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    pub competition_id: Uuid,

    pub stage_id: Uuid,

    pub boat_class_id: Uuid,

    pub category_id: Uuid,

    pub gender: Gender,

    #[serde(default)]
    pub has_repechage: bool,

    #[validate(range(min = 1, max = 64, message = "direct advance must be between 1 and 64"))]
    pub time_trial_direct_advance: i32,

    #[validate(range(min = 0, max = 64))]
    #[serde(default)]
    pub time_trial_to_repechage: i32,

    #[validate(range(min = 1, max = 16, message = "knockout advance must be between 1 and 16"))]
    pub knockout_advance: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    pub event_id: Uuid,
    pub competition_id: Uuid,
    pub stage_id: Uuid,
    pub boat_class_id: Uuid,
    pub category_id: Uuid,
    pub gender: Gender,
    pub status: EventStatus,
    pub current_phase: Option<Phase>,
    pub has_repechage: bool,
    pub time_trial_direct_advance: i32,
    pub time_trial_to_repechage: i32,
    pub knockout_advance: i32,
    pub medals: Medals,
    pub created_at: chrono::NaiveDateTime,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let medals = event.medals();
        Self {
            event_id: event.event_id,
            competition_id: event.competition_id,
            stage_id: event.stage_id,
            boat_class_id: event.boat_class_id,
            category_id: event.category_id,
            gender: event.gender,
            status: event.status,
            current_phase: event.current_phase,
            has_repechage: event.has_repechage,
            time_trial_direct_advance: event.time_trial_direct_advance,
            time_trial_to_repechage: event.time_trial_to_repechage,
            knockout_advance: event.knockout_advance,
            medals,
            created_at: event.created_at,
        }
    }
}

/// Query parameters for listing a competition's events.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct EventListQuery {
    pub competition_id: Uuid,
}

/// Request payload for seeding the time trial from approved entries.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SeedTimeTrialRequest {
    #[validate(length(min = 1, message = "at least one entry is required"))]
    pub entry_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProcessPhaseResponse {
    pub message: String,
    pub advanced_count: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BracketResponse {
    pub event: EventResponse,
    /// Races keyed by phase name, in phase order within each key.
    pub phases: BTreeMap<String, Vec<RaceDetail>>,
}

/// Bulk approval of pending entries. Items are processed one by one so a
/// partial failure leaves an enumerable remainder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApproveEntriesRequest {
    #[validate(length(min = 1, message = "at least one entry is required"))]
    pub entry_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntryFailure {
    pub entry_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchApprovalResponse {
    pub approved: Vec<Uuid>,
    pub failures: Vec<EntryFailure>,
}
