use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "entry_status", rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Approved,
    Rejected,
}

/// A registration for one event slot: a single athlete or an ordered crew,
/// bound to a category and boat class within a competition. Seat order lives
/// in the `entry_athletes` join table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionEntry {
    pub entry_id: Uuid,
    pub competition_id: Uuid,
    pub category_id: Uuid,
    pub boat_class_id: Uuid,
    pub club_id: Uuid,
    pub display_name: String,
    pub gender: Gender,
    pub status: EntryStatus,
    pub submitted_at: chrono::NaiveDateTime,
}
