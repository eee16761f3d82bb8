//! Scoring policy: point tables, finish-order resolution and medal tallies.
//! Pure functions shared by the ranking aggregator and the progression
//! machine; nothing here touches the database.

use rust_decimal::Decimal;

use crate::error::{Result, StorageError};
use crate::models::LaneStatus;

pub const DEFAULT_POINT_TABLE: [u32; 8] = [20, 12, 8, 6, 4, 3, 2, 1];

/// Position-to-points mapping. Positions past `max_scoring_position` (or past
/// the table) score zero.
#[derive(Debug, Clone)]
pub struct PointTable {
    values: Vec<u32>,
    max_scoring_position: u32,
}

impl PointTable {
    pub fn new(values: Vec<u32>, max_scoring_position: u32) -> Self {
        Self {
            values,
            max_scoring_position,
        }
    }

    pub fn points_for_position(&self, position: Option<u32>) -> u32 {
        let Some(position) = position else {
            return 0;
        };
        if position == 0 || position > self.max_scoring_position {
            return 0;
        }
        self.values
            .get(position as usize - 1)
            .copied()
            .unwrap_or(0)
    }
}

impl Default for PointTable {
    fn default() -> Self {
        Self::new(DEFAULT_POINT_TABLE.to_vec(), DEFAULT_POINT_TABLE.len() as u32)
    }
}

/// Result data of one lane as the resolver consumes it.
#[derive(Debug, Clone)]
pub struct LaneOutcome {
    pub lane_number: i32,
    pub finish_time: Option<Decimal>,
    pub status: LaneStatus,
}

/// What happens to `dns`/`dnf`/`dsq` lanes when resolving a heat.
///
/// * `Exclude` — no position; this is what gets persisted on lanes.
/// * `ExtendIfSparse` — positions continue past the finishers, in lane
///   order, but only when fewer boats finished than the lane capacity.
///   Used when a ranking system sets `dnf_gets_points_if_few_finishers`.
/// * `RankLast` — positions always continue past the finishers; the
///   progression machine uses this so every heat has a usable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinisherRule {
    Exclude,
    ExtendIfSparse { lane_capacity: u32 },
    RankLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub lane_number: i32,
    pub position: Option<u32>,
}

/// Sorts `ok` lanes by ascending finish time and assigns positions 1..k.
/// Equal times share the position and the next finisher skips past the tie
/// (competition numbering); each tied lane scores that position in full.
/// Non-finishers follow in lane order, positioned per `rule`.
///
/// Returned placements are ordered: finishers first, then non-finishers.
pub fn resolve_finish_order(
    lanes: &[LaneOutcome],
    rule: NonFinisherRule,
) -> Result<Vec<Placement>> {
    let mut finishers: Vec<&LaneOutcome> = Vec::new();
    let mut others: Vec<&LaneOutcome> = Vec::new();

    for lane in lanes {
        if lane.status.finished() {
            if lane.finish_time.is_none() {
                return Err(StorageError::inconsistency(format!(
                    "lane {} finished without a recorded time",
                    lane.lane_number
                )));
            }
            finishers.push(lane);
        } else {
            others.push(lane);
        }
    }

    finishers.sort_by(|a, b| {
        a.finish_time
            .cmp(&b.finish_time)
            .then(a.lane_number.cmp(&b.lane_number))
    });
    others.sort_by_key(|lane| lane.lane_number);

    let mut placements = Vec::with_capacity(lanes.len());
    let mut position = 0u32;
    for (i, lane) in finishers.iter().enumerate() {
        if i == 0 || lane.finish_time != finishers[i - 1].finish_time {
            position = i as u32 + 1;
        }
        placements.push(Placement {
            lane_number: lane.lane_number,
            position: Some(position),
        });
    }

    let extend = match rule {
        NonFinisherRule::Exclude => false,
        NonFinisherRule::RankLast => true,
        NonFinisherRule::ExtendIfSparse { lane_capacity } => {
            (finishers.len() as u32) < lane_capacity
        }
    };

    let mut next = finishers.len() as u32 + 1;
    for lane in others {
        placements.push(Placement {
            lane_number: lane.lane_number,
            position: extend.then(|| {
                let p = next;
                next += 1;
                p
            }),
        });
    }

    Ok(placements)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MedalTally {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalTally {
    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    pub fn count(&mut self, rank: u32) {
        match rank {
            1 => self.gold += 1,
            2 => self.silver += 1,
            3 => self.bronze += 1,
            _ => {}
        }
    }
}

/// Counts rank 1/2/3 occurrences across all races/stages counted for one
/// entity.
pub fn tally_medals<I>(ranks: I) -> MedalTally
where
    I: IntoIterator<Item = u32>,
{
    let mut tally = MedalTally::default();
    for rank in ranks {
        tally.count(rank);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn ok(lane_number: i32, secs: i64) -> LaneOutcome {
        LaneOutcome {
            lane_number,
            finish_time: Some(Decimal::new(secs, 0)),
            status: LaneStatus::Ok,
        }
    }

    fn out(lane_number: i32, status: LaneStatus) -> LaneOutcome {
        LaneOutcome {
            lane_number,
            finish_time: None,
            status,
        }
    }

    #[test]
    fn test_default_table_points() {
        let table = PointTable::default();
        assert_eq!(table.points_for_position(Some(1)), 20);
        assert_eq!(table.points_for_position(Some(2)), 12);
        assert_eq!(table.points_for_position(Some(8)), 1);
        assert_eq!(table.points_for_position(Some(9)), 0);
        assert_eq!(table.points_for_position(None), 0);
    }

    #[test]
    fn test_max_scoring_position_cuts_table_short() {
        let table = PointTable::new(vec![10, 8, 6, 5], 3);
        assert_eq!(table.points_for_position(Some(3)), 6);
        assert_eq!(table.points_for_position(Some(4)), 0);
    }

    #[test]
    fn test_finish_order_sorts_by_time() {
        let lanes = vec![ok(1, 400), ok(2, 390), ok(3, 410)];
        let placements = resolve_finish_order(&lanes, NonFinisherRule::Exclude).unwrap();
        assert_eq!(placements[0].lane_number, 2);
        assert_eq!(placements[0].position, Some(1));
        assert_eq!(placements[1].lane_number, 1);
        assert_eq!(placements[1].position, Some(2));
        assert_eq!(placements[2].lane_number, 3);
        assert_eq!(placements[2].position, Some(3));
    }

    #[test]
    fn test_ties_share_position_and_next_skips() {
        let lanes = vec![ok(1, 400), ok(2, 400), ok(3, 410)];
        let placements = resolve_finish_order(&lanes, NonFinisherRule::Exclude).unwrap();
        assert_eq!(placements[0].position, Some(1));
        assert_eq!(placements[1].position, Some(1));
        assert_eq!(placements[2].position, Some(3));
    }

    #[test]
    fn test_non_finishers_get_no_position_by_default() {
        let lanes = vec![ok(1, 400), out(2, LaneStatus::Dnf), out(3, LaneStatus::Dsq)];
        let placements = resolve_finish_order(&lanes, NonFinisherRule::Exclude).unwrap();
        assert_eq!(placements[1].position, None);
        assert_eq!(placements[2].position, None);
    }

    #[test]
    fn test_sparse_heat_extends_non_finishers_in_lane_order() {
        // Two finishers in a six-lane heat: the four non-starters take
        // positions 3-6 in lane order.
        let lanes = vec![
            out(1, LaneStatus::Dns),
            ok(2, 395),
            out(3, LaneStatus::Dns),
            ok(4, 388),
            out(5, LaneStatus::Dns),
            out(6, LaneStatus::Dns),
        ];
        let placements =
            resolve_finish_order(&lanes, NonFinisherRule::ExtendIfSparse { lane_capacity: 6 })
                .unwrap();
        assert_eq!(placements[0], Placement { lane_number: 4, position: Some(1) });
        assert_eq!(placements[1], Placement { lane_number: 2, position: Some(2) });
        assert_eq!(placements[2], Placement { lane_number: 1, position: Some(3) });
        assert_eq!(placements[3], Placement { lane_number: 3, position: Some(4) });
        assert_eq!(placements[4], Placement { lane_number: 5, position: Some(5) });
        assert_eq!(placements[5], Placement { lane_number: 6, position: Some(6) });
    }

    #[test]
    fn test_full_heat_does_not_extend() {
        let lanes = vec![ok(1, 400), ok(2, 402), out(3, LaneStatus::Dnf)];
        let placements =
            resolve_finish_order(&lanes, NonFinisherRule::ExtendIfSparse { lane_capacity: 2 })
                .unwrap();
        assert_eq!(placements[2].position, None);
    }

    #[test]
    fn test_rank_last_always_orders_non_finishers() {
        let lanes = vec![out(1, LaneStatus::Dnf), ok(2, 401)];
        let placements = resolve_finish_order(&lanes, NonFinisherRule::RankLast).unwrap();
        assert_eq!(placements[0], Placement { lane_number: 2, position: Some(1) });
        assert_eq!(placements[1], Placement { lane_number: 1, position: Some(2) });
    }

    #[test]
    fn test_finisher_without_time_is_fatal() {
        let lanes = vec![LaneOutcome {
            lane_number: 1,
            finish_time: None,
            status: LaneStatus::Ok,
        }];
        let err = resolve_finish_order(&lanes, NonFinisherRule::Exclude).unwrap_err();
        assert!(matches!(err, StorageError::Inconsistency(_)));
    }

    #[test]
    fn test_medal_tally() {
        let tally = tally_medals([1, 1, 2, 3, 4, 5]);
        assert_eq!(tally.gold, 2);
        assert_eq!(tally.silver, 1);
        assert_eq!(tally.bronze, 1);
        assert_eq!(tally.total(), 4);
    }
}
