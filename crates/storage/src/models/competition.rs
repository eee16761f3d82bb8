use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: Uuid,
    pub name: String,
    pub slug: String,
    pub status: String,
    pub venue: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: chrono::NaiveDateTime,
}

/// One journey leg of a multi-stage competition. Stages are the scoring
/// opportunities cup rankings aggregate over, distinct from knockout phases.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Stage {
    pub stage_id: Uuid,
    pub competition_id: Uuid,
    pub number: i32,
    pub name: String,
    pub scheduled_date: Option<NaiveDate>,
}
