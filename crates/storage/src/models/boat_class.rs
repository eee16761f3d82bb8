use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

/// Boat class reference data. `crew_size` is the number of seats per entry;
/// `lane_capacity` is how many boats race abreast in one heat.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BoatClass {
    pub boat_class_id: Uuid,
    pub code: String,
    pub name: String,
    pub crew_size: i16,
    pub lane_capacity: i16,
    pub discipline: String,
    pub weight_class: String,
    pub gender_scope: Gender,
}
