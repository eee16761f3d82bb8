use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

/// Licensed athlete. Identity is immutable; club affiliation and the active
/// flag change over time and are owned by the membership subsystem — the
/// engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Athlete {
    pub athlete_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub club_id: Option<Uuid>,
    pub active: bool,
    pub created_at: chrono::NaiveDateTime,
}
