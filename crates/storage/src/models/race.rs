use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "race_status", rename_all = "snake_case")]
pub enum RaceStatus {
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "lane_status", rename_all = "snake_case")]
pub enum LaneStatus {
    Ok,
    Dns,
    Dnf,
    Dsq,
}

impl LaneStatus {
    pub fn finished(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// One heat within a phase. Once `status` is `Completed` the lane results
/// below it are append-only history; corrections record a new result set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Race {
    pub race_id: Uuid,
    pub event_id: Uuid,
    pub phase: Phase,
    pub heat_number: i32,
    pub status: RaceStatus,
    pub created_at: chrono::NaiveDateTime,
}

/// A lane assignment, and after completion the recorded result. `finish_time`
/// is seconds; `position` is the plain finish position among `ok` finishers
/// (ties share it), with no points-extension applied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lane {
    pub lane_id: Uuid,
    pub race_id: Uuid,
    pub lane_number: i32,
    pub entry_id: Uuid,
    pub finish_time: Option<Decimal>,
    pub status: Option<LaneStatus>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceWithLanes {
    pub race: Race,
    pub lanes: Vec<Lane>,
}
