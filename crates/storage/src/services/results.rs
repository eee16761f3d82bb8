//! Result entry: attaches recorded results to a scheduled race and computes
//! the stored finish positions. Once a race is completed its lane results
//! are immutable; corrections record a new result set rather than editing
//! history, so aggregation and progression stay reproducible.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::race::{LaneResultInput, RecordResultsRequest};
use crate::error::{Result, StorageError};
use crate::models::{RaceStatus, RaceWithLanes};
use crate::repository::race as race_repo;

use super::scoring::{self, LaneOutcome, NonFinisherRule};

pub async fn record_race_results(
    pool: &PgPool,
    race_id: Uuid,
    request: &RecordResultsRequest,
) -> Result<RaceWithLanes> {
    request
        .validate_semantics()
        .map_err(StorageError::Validation)?;

    let mut tx = pool.begin().await?;
    let race = race_repo::find_for_update(&mut tx, race_id).await?;

    if race.status == RaceStatus::Completed {
        return Err(StorageError::state_conflict(
            "race is already completed; corrections require a new result set",
        ));
    }

    let lanes = race_repo::load_lanes(&mut tx, race_id).await?;

    // The submitted results must cover exactly the scheduled lanes.
    let mut by_lane: HashMap<i32, &LaneResultInput> = HashMap::new();
    for result in &request.results {
        if by_lane.insert(result.lane_number, result).is_some() {
            return Err(StorageError::validation(format!(
                "duplicate result for lane {}",
                result.lane_number
            )));
        }
    }
    if by_lane.len() != lanes.len() {
        return Err(StorageError::validation(format!(
            "expected results for {} lanes, got {}",
            lanes.len(),
            by_lane.len()
        )));
    }
    for lane in &lanes {
        if !by_lane.contains_key(&lane.lane_number) {
            return Err(StorageError::validation(format!(
                "missing result for lane {}",
                lane.lane_number
            )));
        }
    }

    let outcomes: Vec<LaneOutcome> = lanes
        .iter()
        .map(|lane| {
            let result = by_lane[&lane.lane_number];
            LaneOutcome {
                lane_number: lane.lane_number,
                finish_time: result.finish_time.filter(|_| result.status.finished()),
                status: result.status,
            }
        })
        .collect();
    let placements = scoring::resolve_finish_order(&outcomes, NonFinisherRule::Exclude)?;
    let position_by_lane: HashMap<i32, Option<u32>> = placements
        .into_iter()
        .map(|p| (p.lane_number, p.position))
        .collect();

    for lane in &lanes {
        let result = by_lane[&lane.lane_number];
        let position = position_by_lane
            .get(&lane.lane_number)
            .copied()
            .flatten()
            .map(|p| p as i32);
        race_repo::store_lane_result(
            &mut tx,
            lane.lane_id,
            result.finish_time.filter(|_| result.status.finished()),
            result.status,
            position,
        )
        .await?;
    }
    race_repo::mark_completed(&mut tx, race_id).await?;
    tx.commit().await?;

    let repo = race_repo::RaceRepository::new(pool);
    repo.find_with_lanes(race_id).await
}
