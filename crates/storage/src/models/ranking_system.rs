use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "ranking_group_by", rename_all = "snake_case")]
pub enum GroupBy {
    Gender,
    Category,
    CategoryGender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "ranking_entity_type", rename_all = "snake_case")]
pub enum EntityType {
    Athlete,
    Club,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "ranking_scoring_mode", rename_all = "snake_case")]
pub enum ScoringMode {
    Points,
    Medals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "ranking_journey_mode", rename_all = "snake_case")]
pub enum JourneyMode {
    All,
    FinalOnly,
    BestN,
}

/// How results feed the entity axis in club rankings. `Mixed` routes
/// single-seat results to the athlete and crew results to the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "ranking_point_mode", rename_all = "snake_case")]
pub enum PointMode {
    Standard,
    Mixed,
}

/// Administrator-defined ranking configuration. Immutable while a ranking
/// computation runs; the point table rows live in `ranking_system_points`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RankingSystem {
    pub system_id: Uuid,
    pub competition_id: Option<Uuid>,
    pub name: String,
    pub group_by: GroupBy,
    pub entity_type: EntityType,
    pub scoring_mode: ScoringMode,
    pub journey_mode: JourneyMode,
    pub best_n_count: Option<i32>,
    pub point_mode: PointMode,
    pub max_scoring_position: i32,
    pub dnf_gets_points_if_few_finishers: bool,
    pub created_at: chrono::NaiveDateTime,
}
