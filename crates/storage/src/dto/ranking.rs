use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{EntityType, Gender, GroupBy, JourneyMode, PointMode, ScoringMode};

/// Query parameters for `GET /competitions/{slug}/rankings`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RankingQuery {
    pub system_id: Uuid,
    #[serde(default)]
    pub include_masters: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StageInfo {
    pub number: i32,
    pub name: String,
}

/// Display metadata carried alongside each group key.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupMetadata {
    pub gender: Option<Gender>,
    pub category_code: Option<String>,
    pub title_es: Option<String>,
    pub title_en: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Athlete,
    Club,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StagePoints {
    pub stage_number: i32,
    pub points: u32,
}

/// Score column set for one ranking row. The variant is decided once by the
/// aggregator from entity type and scoring mode, so consumers render without
/// re-branching.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RankingScore {
    Points {
        total: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        by_stage: Option<Vec<StagePoints>>,
    },
    Medals {
        gold: u32,
        silver: u32,
        bronze: u32,
        total: u32,
    },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankingEntry {
    pub rank: u32,
    pub entity: EntityRef,
    pub score: RankingScore,
    /// How many times the entity took each finish position.
    pub position_counts: BTreeMap<u32, u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RankingsResponse {
    pub system_id: Uuid,
    pub group_by: GroupBy,
    pub scoring_mode: ScoringMode,
    pub stages: Vec<StageInfo>,
    pub rankings: BTreeMap<String, Vec<RankingEntry>>,
    pub group_metadata: BTreeMap<String, GroupMetadata>,
}

/// Request payload for creating a ranking system.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRankingSystemRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    pub competition_id: Option<Uuid>,

    pub group_by: GroupBy,

    pub entity_type: EntityType,

    pub scoring_mode: ScoringMode,

    pub journey_mode: JourneyMode,

    #[validate(range(min = 1, max = 64, message = "best_n_count must be between 1 and 64"))]
    pub best_n_count: Option<i32>,

    #[serde(default = "default_point_mode")]
    pub point_mode: PointMode,

    #[validate(range(min = 1, max = 64))]
    #[serde(default = "default_max_scoring_position")]
    pub max_scoring_position: i32,

    #[serde(default)]
    pub dnf_gets_points_if_few_finishers: bool,

    /// Position → points rows; empty means the default 20/12/8/6/4/3/2/1.
    #[serde(default)]
    pub point_table: Vec<PointTableRow>,
}

fn default_point_mode() -> PointMode {
    PointMode::Standard
}

fn default_max_scoring_position() -> i32 {
    8
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PointTableRow {
    pub position: i32,
    pub points: i32,
}

impl CreateRankingSystemRequest {
    /// Cross-field checks the derive cannot express.
    pub fn validate_semantics(&self) -> Result<(), String> {
        if self.journey_mode == JourneyMode::BestN && self.best_n_count.is_none() {
            return Err("journey_mode best_n requires best_n_count".to_string());
        }
        for row in &self.point_table {
            if row.position < 1 || row.points < 0 {
                return Err(format!(
                    "invalid point table row (position {}, points {})",
                    row.position, row.points
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateRankingSystemRequest {
        CreateRankingSystemRequest {
            name: "Copa Federación".to_string(),
            competition_id: None,
            group_by: GroupBy::CategoryGender,
            entity_type: EntityType::Club,
            scoring_mode: ScoringMode::Points,
            journey_mode: JourneyMode::All,
            best_n_count: None,
            point_mode: PointMode::Standard,
            max_scoring_position: 8,
            dnf_gets_points_if_few_finishers: false,
            point_table: vec![],
        }
    }

    #[test]
    fn test_best_n_requires_count() {
        let mut req = request();
        req.journey_mode = JourneyMode::BestN;
        assert!(req.validate_semantics().is_err());
        req.best_n_count = Some(2);
        assert!(req.validate_semantics().is_ok());
    }

    #[test]
    fn test_point_table_rows_must_be_positive() {
        let mut req = request();
        req.point_table = vec![PointTableRow { position: 0, points: 10 }];
        assert!(req.validate_semantics().is_err());
    }
}
