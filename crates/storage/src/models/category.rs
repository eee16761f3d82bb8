use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

/// Age/eligibility bracket with a gender scope and display titles per
/// language. Read-only reference data for the engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub category_id: Uuid,
    pub code: String,
    pub title_es: String,
    pub title_en: String,
    pub gender: Gender,
    pub masters: bool,
    pub age_min: Option<i16>,
    pub age_max: Option<i16>,
}
