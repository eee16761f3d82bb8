use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{LaneStatus, Phase, RaceStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LaneResultInput {
    pub lane_number: i32,
    /// Finish time in seconds. Required for `ok`, ignored otherwise.
    pub finish_time: Option<Decimal>,
    pub status: LaneStatus,
}

/// Request payload attaching results to a scheduled race. Rejected once the
/// race is completed; corrections are a new recorded result set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordResultsRequest {
    #[validate(length(min = 1, message = "at least one lane result is required"))]
    pub results: Vec<LaneResultInput>,
}

impl RecordResultsRequest {
    pub fn validate_semantics(&self) -> Result<(), String> {
        for result in &self.results {
            if result.status == LaneStatus::Ok && result.finish_time.is_none() {
                return Err(format!(
                    "lane {} is ok but has no finish time",
                    result.lane_number
                ));
            }
            if let Some(time) = result.finish_time
                && time <= Decimal::ZERO
            {
                return Err(format!("lane {} has a non-positive time", result.lane_number));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LaneDetail {
    pub lane_number: i32,
    pub entry_id: Uuid,
    pub entrant: String,
    pub club: String,
    pub finish_time: Option<Decimal>,
    pub status: Option<LaneStatus>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RaceDetail {
    pub race_id: Uuid,
    pub event_id: Uuid,
    pub phase: Phase,
    pub heat_number: i32,
    pub status: RaceStatus,
    pub lanes: Vec<LaneDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_lane_requires_time() {
        let request = RecordResultsRequest {
            results: vec![LaneResultInput {
                lane_number: 1,
                finish_time: None,
                status: LaneStatus::Ok,
            }],
        };
        assert!(request.validate_semantics().is_err());
    }

    #[test]
    fn test_dns_lane_without_time_is_fine() {
        let request = RecordResultsRequest {
            results: vec![LaneResultInput {
                lane_number: 1,
                finish_time: None,
                status: LaneStatus::Dns,
            }],
        };
        assert!(request.validate_semantics().is_ok());
    }
}
