//! Bracket progression: the per-event state machine that seeds the time
//! trial, consumes recorded results and advances entrants through repechage,
//! knockout rounds and finals.
//!
//! Each `advance_*` function is a pure guarded transition from a snapshot
//! (event row + its races) to a plan (next phase, generated races, medals),
//! so the guard conditions are testable without persistence. `seed_time_trial`
//! and `process_phase` apply a plan inside one transaction holding a
//! `SELECT ... FOR UPDATE` lock on the event row: event progression is
//! single-writer and concurrent invocations must not interleave their
//! read-then-write.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::event::ProcessPhaseResponse;
use crate::error::{Result, StorageError};
use crate::models::{Event, EventStatus, Medals, Phase, RaceStatus, RaceWithLanes};
use crate::repository::entry::EntryRepository;
use crate::repository::event as event_repo;

use super::scoring::{self, LaneOutcome, NonFinisherRule};

/// A race the machine wants created, before it has identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRace {
    pub phase: Phase,
    pub heat_number: i32,
    pub lanes: Vec<NewLane>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLane {
    pub lane_number: i32,
    pub entry_id: Uuid,
}

/// Outcome of one guarded transition.
#[derive(Debug, Clone)]
pub struct PhasePlan {
    /// Phase to move `current_phase` to; `None` keeps it (finals).
    pub next_phase: Option<Phase>,
    pub event_status: EventStatus,
    pub races: Vec<NewRace>,
    pub medals: Option<Medals>,
    pub advanced: Vec<Uuid>,
    pub eliminated: Vec<Uuid>,
}

/// Partitions entrants into time-trial heats. Heats are as even as possible
/// within the lane capacity and lanes follow the supplied seeding order
/// (entry submission order unless a seeding rule said otherwise).
pub fn plan_time_trial(entry_ids: &[Uuid], lane_capacity: u32) -> Result<Vec<NewRace>> {
    if entry_ids.is_empty() {
        return Err(StorageError::validation("cannot seed a time trial without entries"));
    }
    if lane_capacity == 0 {
        return Err(StorageError::inconsistency("boat class has zero lane capacity"));
    }

    let capacity = lane_capacity as usize;
    let heats = entry_ids.len().div_ceil(capacity);
    let base = entry_ids.len() / heats;
    let remainder = entry_ids.len() % heats;

    let mut races = Vec::with_capacity(heats);
    let mut cursor = 0usize;
    for heat in 0..heats {
        let size = base + usize::from(heat < remainder);
        let lanes = entry_ids[cursor..cursor + size]
            .iter()
            .enumerate()
            .map(|(i, entry_id)| NewLane {
                lane_number: i as i32 + 1,
                entry_id: *entry_id,
            })
            .collect();
        races.push(NewRace {
            phase: Phase::TimeTrial,
            heat_number: heat as i32 + 1,
            lanes,
        });
        cursor += size;
    }
    Ok(races)
}

/// Processes a completed time trial: ranks all entrants across heats,
/// advances the top block, seeds the repechage (when configured) or the
/// entry knockout phase, and eliminates the rest.
pub fn advance_time_trial(
    event: &Event,
    lane_capacity: u32,
    races: &[RaceWithLanes],
) -> Result<PhasePlan> {
    guard_phase(event, Phase::TimeTrial)?;

    let trial_races: Vec<&RaceWithLanes> =
        races.iter().filter(|r| r.race.phase == Phase::TimeTrial).collect();
    if trial_races.is_empty() {
        return Err(StorageError::inconsistency("event has no time-trial races"));
    }
    require_completed(&trial_races, Phase::TimeTrial)?;

    let order = overall_time_trial_order(&trial_races)?;
    let config = event.progression();

    // Advancement counts clamp to the live field; nobody phantom advances.
    let direct_count = (config.time_trial_direct_advance as usize).min(order.len());
    let repechage_count = if config.has_repechage {
        (config.time_trial_to_repechage as usize).min(order.len() - direct_count)
    } else {
        0
    };

    let direct: Vec<Uuid> = order[..direct_count].to_vec();
    let repechage: Vec<Uuid> = order[direct_count..direct_count + repechage_count].to_vec();
    let eliminated: Vec<Uuid> = order[direct_count + repechage_count..].to_vec();

    let (next_phase, new_races) = if !repechage.is_empty() {
        // Direct qualifiers wait; only the repechage races run next.
        (
            Phase::Repechage,
            seed_phase(&repechage, Phase::Repechage, lane_capacity)?,
        )
    } else {
        let entry_phase = phase_for_field(direct.len(), lane_capacity)?;
        (entry_phase, seed_phase(&direct, entry_phase, lane_capacity)?)
    };

    let mut advanced = direct;
    advanced.extend(&repechage);

    Ok(PhasePlan {
        next_phase: Some(next_phase),
        event_status: EventStatus::InProgress,
        races: new_races,
        medals: None,
        advanced,
        eliminated,
    })
}

/// Processes a completed knockout round (repechage, quarterfinal or
/// semifinal). Repechage winners merge with the time-trial direct qualifiers;
/// semifinal non-advancers fill the B final.
pub fn advance_knockout(
    event: &Event,
    phase: Phase,
    lane_capacity: u32,
    races: &[RaceWithLanes],
) -> Result<PhasePlan> {
    if !matches!(phase, Phase::Repechage | Phase::Quarterfinal | Phase::Semifinal) {
        return Err(StorageError::validation(format!(
            "phase {phase} is not a processable knockout round"
        )));
    }
    guard_phase(event, phase)?;

    let phase_races: Vec<&RaceWithLanes> =
        races.iter().filter(|r| r.race.phase == phase).collect();
    if phase_races.is_empty() {
        return Err(StorageError::inconsistency(format!("event has no {phase} races")));
    }
    require_completed(&phase_races, phase)?;

    let config = event.progression();
    let (winners, losers) = split_heats(&phase_races, config.knockout_advance as usize)?;

    match phase {
        Phase::Repechage => {
            // Re-derive the direct qualifiers from the completed time trial
            // so the merge is reproducible from the result log alone.
            let trial_races: Vec<&RaceWithLanes> = races
                .iter()
                .filter(|r| r.race.phase == Phase::TimeTrial)
                .collect();
            if trial_races.is_empty() {
                return Err(StorageError::inconsistency(
                    "repechage exists but the time trial has no races",
                ));
            }
            let trial_order = overall_time_trial_order(&trial_races)?;
            let direct_count =
                (config.time_trial_direct_advance as usize).min(trial_order.len());

            let mut pool: Vec<Uuid> = trial_order[..direct_count].to_vec();
            pool.extend(&winners);

            let entry_phase = phase_for_field(pool.len(), lane_capacity)?;
            Ok(PhasePlan {
                next_phase: Some(entry_phase),
                event_status: EventStatus::InProgress,
                races: seed_phase(&pool, entry_phase, lane_capacity)?,
                medals: None,
                advanced: pool,
                eliminated: losers,
            })
        }
        Phase::Quarterfinal => {
            let next = phase_for_field(winners.len(), lane_capacity)?;
            if next <= phase {
                return Err(StorageError::validation(
                    "knockout advancement leaves too many qualifiers for the next round",
                ));
            }
            Ok(PhasePlan {
                next_phase: Some(next),
                event_status: EventStatus::InProgress,
                races: seed_phase(&winners, next, lane_capacity)?,
                medals: None,
                advanced: winners,
                eliminated: losers,
            })
        }
        Phase::Semifinal => {
            let capacity = lane_capacity as usize;
            if winners.len() > capacity {
                return Err(StorageError::validation(
                    "semifinal advancement does not fit the A final",
                ));
            }
            let mut new_races = vec![single_heat(&winners, Phase::FinalA)];
            let b_finalists: Vec<Uuid> = losers.iter().copied().take(capacity).collect();
            let eliminated: Vec<Uuid> = losers.iter().copied().skip(capacity).collect();
            if !b_finalists.is_empty() {
                // The B final races before the A final.
                new_races.insert(0, single_heat(&b_finalists, Phase::FinalB));
            }
            let mut advanced = winners;
            advanced.extend(&b_finalists);
            Ok(PhasePlan {
                next_phase: Some(Phase::FinalA),
                event_status: EventStatus::InProgress,
                races: new_races,
                medals: None,
                advanced,
                eliminated,
            })
        }
        _ => unreachable!("guarded above"),
    }
}

/// Settles the finals: medals come from the A-final finish order and the
/// event becomes `completed`, which is terminal.
pub fn finalize(event: &Event, races: &[RaceWithLanes]) -> Result<PhasePlan> {
    guard_phase(event, Phase::FinalA)?;

    let finals: Vec<&RaceWithLanes> = races
        .iter()
        .filter(|r| matches!(r.race.phase, Phase::FinalA | Phase::FinalB))
        .collect();
    let a_finals: Vec<&&RaceWithLanes> =
        finals.iter().filter(|r| r.race.phase == Phase::FinalA).collect();
    match a_finals.len() {
        0 => return Err(StorageError::inconsistency("event has no A final")),
        1 => {}
        _ => return Err(StorageError::inconsistency("event has more than one A final")),
    }
    require_completed(&finals, Phase::FinalA)?;

    let order = heat_order(a_finals[0])?;
    let medals = Medals {
        gold: order.first().copied(),
        silver: order.get(1).copied(),
        bronze: order.get(2).copied(),
    };

    Ok(PhasePlan {
        next_phase: None,
        event_status: EventStatus::Completed,
        races: Vec::new(),
        medals: Some(medals),
        advanced: Vec::new(),
        eliminated: Vec::new(),
    })
}

/// Knockout entry phase for a qualifier field of `n` boats.
pub fn phase_for_field(n: usize, lane_capacity: u32) -> Result<Phase> {
    if n == 0 {
        return Err(StorageError::validation("advancement rules leave no qualifiers"));
    }
    let capacity = lane_capacity.max(1) as usize;
    if n <= capacity {
        Ok(Phase::FinalA)
    } else if n <= 2 * capacity {
        Ok(Phase::Semifinal)
    } else if n <= 4 * capacity {
        Ok(Phase::Quarterfinal)
    } else {
        Err(StorageError::validation(format!(
            "a field of {n} does not fit a knockout bracket with {capacity} lanes"
        )))
    }
}

fn guard_phase(event: &Event, phase: Phase) -> Result<()> {
    if event.status == EventStatus::Completed {
        return Err(StorageError::state_conflict("event is already completed"));
    }
    let Some(current) = event.current_phase else {
        return Err(StorageError::state_conflict("the time trial has not been seeded yet"));
    };
    if current > phase {
        return Err(StorageError::state_conflict(format!(
            "phase {phase} was already processed (event is in {current})"
        )));
    }
    if current < phase {
        return Err(StorageError::state_conflict(format!(
            "phase {phase} is not ready: event is still in {current}"
        )));
    }
    Ok(())
}

fn require_completed(races: &[&RaceWithLanes], phase: Phase) -> Result<()> {
    let pending = races
        .iter()
        .filter(|r| r.race.status != RaceStatus::Completed)
        .count();
    if pending > 0 {
        return Err(StorageError::state_conflict(format!(
            "cannot process {phase}: {pending} race(s) still pending results"
        )));
    }
    Ok(())
}

/// Finish order of one completed heat, entry ids best-first. Non-finishers
/// rank last in lane order so a sparse heat still yields a usable order.
fn heat_order(race: &RaceWithLanes) -> Result<Vec<Uuid>> {
    if race.lanes.is_empty() {
        return Err(StorageError::inconsistency(format!(
            "race {} has no lanes",
            race.race.race_id
        )));
    }
    let mut outcomes = Vec::with_capacity(race.lanes.len());
    for lane in &race.lanes {
        let Some(status) = lane.status else {
            return Err(StorageError::inconsistency(format!(
                "race {} is completed but lane {} has no recorded status",
                race.race.race_id, lane.lane_number
            )));
        };
        outcomes.push(LaneOutcome {
            lane_number: lane.lane_number,
            finish_time: lane.finish_time,
            status,
        });
    }
    let placements = scoring::resolve_finish_order(&outcomes, NonFinisherRule::RankLast)?;
    placements
        .into_iter()
        .map(|p| {
            race.lanes
                .iter()
                .find(|l| l.lane_number == p.lane_number)
                .map(|l| l.entry_id)
                .ok_or_else(|| StorageError::inconsistency("placement for unknown lane"))
        })
        .collect()
}

/// Overall time-trial order across heats: `ok` finishers by time, then
/// non-finishers by heat and lane.
fn overall_time_trial_order(races: &[&RaceWithLanes]) -> Result<Vec<Uuid>> {
    let mut finishers: Vec<(rust_decimal::Decimal, i32, i32, Uuid)> = Vec::new();
    let mut others: Vec<(i32, i32, Uuid)> = Vec::new();

    for race in races {
        for lane in &race.lanes {
            let Some(status) = lane.status else {
                return Err(StorageError::inconsistency(format!(
                    "race {} is completed but lane {} has no recorded status",
                    race.race.race_id, lane.lane_number
                )));
            };
            if status.finished() {
                let Some(time) = lane.finish_time else {
                    return Err(StorageError::inconsistency(format!(
                        "lane {} finished without a recorded time",
                        lane.lane_number
                    )));
                };
                finishers.push((time, race.race.heat_number, lane.lane_number, lane.entry_id));
            } else {
                others.push((race.race.heat_number, lane.lane_number, lane.entry_id));
            }
        }
    }

    finishers.sort();
    others.sort();

    Ok(finishers
        .into_iter()
        .map(|(_, _, _, id)| id)
        .chain(others.into_iter().map(|(_, _, id)| id))
        .collect())
}

/// Top `advance` of each heat (position-major, heat-minor across heats) and
/// everyone else in the same interleaved order.
fn split_heats(
    races: &[&RaceWithLanes],
    advance: usize,
) -> Result<(Vec<Uuid>, Vec<Uuid>)> {
    let mut heats: Vec<&RaceWithLanes> = races.to_vec();
    heats.sort_by_key(|r| r.race.heat_number);
    let orders: Vec<Vec<Uuid>> = heats
        .iter()
        .map(|r| heat_order(r))
        .collect::<Result<_>>()?;

    let mut winners = Vec::new();
    let mut losers = Vec::new();
    let deepest = orders.iter().map(Vec::len).max().unwrap_or(0);
    for position in 0..deepest {
        for order in &orders {
            if let Some(entry_id) = order.get(position) {
                if position < advance {
                    winners.push(*entry_id);
                } else {
                    losers.push(*entry_id);
                }
            }
        }
    }
    Ok((winners, losers))
}

/// Seeds a qualifier pool into one or more heats of the given phase with
/// serpentine distribution, so heat strengths stay balanced.
fn seed_phase(pool: &[Uuid], phase: Phase, lane_capacity: u32) -> Result<Vec<NewRace>> {
    if pool.is_empty() {
        return Err(StorageError::validation("advancement rules leave no qualifiers"));
    }
    let capacity = lane_capacity.max(1) as usize;
    let heats = pool.len().div_ceil(capacity);
    let distributed = distribute_serpentine(pool, heats);
    Ok(distributed
        .into_iter()
        .enumerate()
        .map(|(heat, entries)| NewRace {
            phase,
            heat_number: heat as i32 + 1,
            lanes: entries
                .into_iter()
                .enumerate()
                .map(|(i, entry_id)| NewLane {
                    lane_number: i as i32 + 1,
                    entry_id,
                })
                .collect(),
        })
        .collect())
}

fn single_heat(pool: &[Uuid], phase: Phase) -> NewRace {
    NewRace {
        phase,
        heat_number: 1,
        lanes: pool
            .iter()
            .enumerate()
            .map(|(i, entry_id)| NewLane {
                lane_number: i as i32 + 1,
                entry_id: *entry_id,
            })
            .collect(),
    }
}

/// Snake seeding: 1→heat 1, 2→heat 2, ..., h→heat h, h+1→heat h, ...
fn distribute_serpentine(pool: &[Uuid], heats: usize) -> Vec<Vec<Uuid>> {
    let mut out: Vec<Vec<Uuid>> = vec![Vec::new(); heats.max(1)];
    let mut index = 0usize;
    let mut forward = true;
    for entry_id in pool {
        out[index].push(*entry_id);
        if forward {
            if index + 1 == out.len() {
                forward = false;
            } else {
                index += 1;
            }
        } else if index == 0 {
            forward = true;
        } else {
            index -= 1;
        }
    }
    out
}

/// Seeds the time trial for an event from its approved entries and moves the
/// event to `in_progress`. Holds the event row lock for the duration.
pub async fn seed_time_trial(
    pool: &PgPool,
    event_id: Uuid,
    entry_ids: &[Uuid],
) -> Result<Vec<RaceWithLanes>> {
    if entry_ids.is_empty() {
        return Err(StorageError::validation("cannot seed a time trial without entries"));
    }

    let mut tx = pool.begin().await?;
    let event = event_repo::find_for_update(&mut tx, event_id).await?;

    if event.status != EventStatus::Pending || event.current_phase.is_some() {
        return Err(StorageError::state_conflict("the time trial is already seeded"));
    }

    let boat_class = event_repo::find_boat_class(&mut tx, event.boat_class_id).await?;
    let entries = EntryRepository::load_for_seeding(&mut tx, entry_ids).await?;

    let mut failures: Vec<String> = Vec::new();
    for entry in &entries {
        if let Err(reason) = EntryRepository::check_eligibility(entry, &event, &boat_class) {
            failures.push(format!("{}: {}", entry.display_name, reason));
        }
    }
    if !failures.is_empty() {
        return Err(StorageError::not_eligible(failures.join("; ")));
    }

    // Stable seeding order: entry submission order.
    let ordered: Vec<Uuid> = entries.iter().map(|e| e.entry_id).collect();
    let planned = plan_time_trial(&ordered, boat_class.lane_capacity.max(0) as u32)?;

    let races = event_repo::insert_races(&mut tx, event_id, &planned).await?;
    event_repo::apply_transition(
        &mut tx,
        event_id,
        Some(Phase::TimeTrial),
        EventStatus::InProgress,
        None,
    )
    .await?;
    tx.commit().await?;

    Ok(races)
}

/// Applies one `ProcessPhase` administrative action under the per-event lock.
pub async fn process_phase(
    pool: &PgPool,
    event_id: Uuid,
    phase: Phase,
) -> Result<ProcessPhaseResponse> {
    if !phase.is_processable() {
        return Err(StorageError::validation(
            "the B final is settled together with the A final",
        ));
    }

    let mut tx = pool.begin().await?;
    let event = event_repo::find_for_update(&mut tx, event_id).await?;
    let boat_class = event_repo::find_boat_class(&mut tx, event.boat_class_id).await?;
    let capacity = boat_class.lane_capacity.max(0) as u32;
    let races = event_repo::load_races_with_lanes_tx(&mut tx, event_id).await?;

    let plan = match phase {
        Phase::TimeTrial => advance_time_trial(&event, capacity, &races)?,
        Phase::Repechage | Phase::Quarterfinal | Phase::Semifinal => {
            advance_knockout(&event, phase, capacity, &races)?
        }
        Phase::FinalA => finalize(&event, &races)?,
        Phase::FinalB => unreachable!("rejected above"),
    };

    if !plan.races.is_empty() {
        event_repo::insert_races(&mut tx, event_id, &plan.races).await?;
    }
    event_repo::apply_transition(
        &mut tx,
        event_id,
        plan.next_phase.or(event.current_phase),
        plan.event_status,
        plan.medals,
    )
    .await?;
    tx.commit().await?;

    let message = match phase {
        Phase::FinalA => "Event completed: medals assigned".to_string(),
        _ => format!(
            "{phase} processed: {} advanced, {} eliminated",
            plan.advanced.len(),
            plan.eliminated.len()
        ),
    };
    Ok(ProcessPhaseResponse {
        message,
        advanced_count: plan.advanced.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Lane, LaneStatus, ProgressionConfig, Race};
    use rust_decimal::Decimal;

    fn event(phase: Option<Phase>, status: EventStatus, config: ProgressionConfig) -> Event {
        Event {
            event_id: Uuid::from_u128(1),
            competition_id: Uuid::from_u128(2),
            stage_id: Uuid::from_u128(3),
            boat_class_id: Uuid::from_u128(4),
            category_id: Uuid::from_u128(5),
            gender: Gender::Women,
            status,
            current_phase: phase,
            has_repechage: config.has_repechage,
            time_trial_direct_advance: config.time_trial_direct_advance as i32,
            time_trial_to_repechage: config.time_trial_to_repechage as i32,
            knockout_advance: config.knockout_advance as i32,
            gold_entry_id: None,
            silver_entry_id: None,
            bronze_entry_id: None,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn no_repechage(direct: u32) -> ProgressionConfig {
        ProgressionConfig {
            has_repechage: false,
            time_trial_direct_advance: direct,
            time_trial_to_repechage: 0,
            knockout_advance: 2,
        }
    }

    fn entry(n: u128) -> Uuid {
        Uuid::from_u128(1000 + n)
    }

    /// A completed race where lane results follow `lanes`: (entry, seconds or
    /// None for a DNS).
    fn completed_race(phase: Phase, heat: i32, lanes: &[(Uuid, Option<i64>)]) -> RaceWithLanes {
        race_with_status(phase, heat, lanes, RaceStatus::Completed)
    }

    fn race_with_status(
        phase: Phase,
        heat: i32,
        lanes: &[(Uuid, Option<i64>)],
        status: RaceStatus,
    ) -> RaceWithLanes {
        let race_id = Uuid::new_v4();
        RaceWithLanes {
            race: Race {
                race_id,
                event_id: Uuid::from_u128(1),
                phase,
                heat_number: heat,
                status,
                created_at: chrono::NaiveDateTime::default(),
            },
            lanes: lanes
                .iter()
                .enumerate()
                .map(|(i, (entry_id, secs))| Lane {
                    lane_id: Uuid::new_v4(),
                    race_id,
                    lane_number: i as i32 + 1,
                    entry_id: *entry_id,
                    finish_time: secs.map(|s| Decimal::new(s, 0)),
                    status: Some(if secs.is_some() { LaneStatus::Ok } else { LaneStatus::Dns }),
                    position: None,
                })
                .collect(),
        }
    }

    fn entry_ids(plan: &PhasePlan) -> Vec<Uuid> {
        plan.races
            .iter()
            .flat_map(|r| r.lanes.iter().map(|l| l.entry_id))
            .collect()
    }

    #[test]
    fn test_time_trial_partition_is_even() {
        let entries: Vec<Uuid> = (0..10).map(entry).collect();
        let races = plan_time_trial(&entries, 6).unwrap();
        assert_eq!(races.len(), 2);
        assert_eq!(races[0].lanes.len(), 5);
        assert_eq!(races[1].lanes.len(), 5);
        assert_eq!(races[0].lanes[0].entry_id, entries[0]);
        assert_eq!(races[1].lanes[0].entry_id, entries[5]);
    }

    #[test]
    fn test_time_trial_rejects_empty_entries() {
        let err = plan_time_trial(&[], 6).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[test]
    fn test_pending_time_trial_race_blocks_processing() {
        let config = no_repechage(2);
        let event = event(Some(Phase::TimeTrial), EventStatus::InProgress, config);
        let races = vec![
            completed_race(Phase::TimeTrial, 1, &[(entry(1), Some(400)), (entry(2), Some(410))]),
            race_with_status(
                Phase::TimeTrial,
                2,
                &[(entry(3), None), (entry(4), None)],
                RaceStatus::Scheduled,
            ),
        ];
        let err = advance_time_trial(&event, 6, &races).unwrap_err();
        assert!(matches!(err, StorageError::StateConflict(_)));
    }

    #[test]
    fn test_five_singles_direct_two_no_repechage() {
        // Five single scullers, two advance directly, no repechage: the
        // other three appear in no later race.
        let config = no_repechage(2);
        let event = event(Some(Phase::TimeTrial), EventStatus::InProgress, config);
        let races = vec![completed_race(
            Phase::TimeTrial,
            1,
            &[
                (entry(1), Some(405)),
                (entry(2), Some(398)),
                (entry(3), Some(412)),
                (entry(4), Some(391)),
                (entry(5), Some(420)),
            ],
        )];
        let plan = advance_time_trial(&event, 6, &races).unwrap();

        assert_eq!(plan.next_phase, Some(Phase::FinalA));
        assert_eq!(plan.advanced, vec![entry(4), entry(2)]);
        assert_eq!(plan.eliminated.len(), 3);
        let seeded = entry_ids(&plan);
        assert_eq!(seeded.len(), 2);
        for eliminated in &plan.eliminated {
            assert!(!seeded.contains(eliminated));
        }
    }

    #[test]
    fn test_advancement_clamps_to_field_size() {
        // Three entrants, direct advance configured as four: exactly three
        // advance and no error is raised.
        let config = no_repechage(4);
        let event = event(Some(Phase::TimeTrial), EventStatus::InProgress, config);
        let races = vec![completed_race(
            Phase::TimeTrial,
            1,
            &[(entry(1), Some(400)), (entry(2), Some(395)), (entry(3), Some(402))],
        )];
        let plan = advance_time_trial(&event, 6, &races).unwrap();
        assert_eq!(plan.advanced.len(), 3);
        assert!(plan.eliminated.is_empty());
    }

    #[test]
    fn test_non_finishers_rank_behind_finishers_across_heats() {
        let config = no_repechage(3);
        let event = event(Some(Phase::TimeTrial), EventStatus::InProgress, config);
        let races = vec![
            completed_race(Phase::TimeTrial, 1, &[(entry(1), None), (entry(2), Some(410))]),
            completed_race(Phase::TimeTrial, 2, &[(entry(3), Some(430)), (entry(4), Some(405))]),
        ];
        let plan = advance_time_trial(&event, 6, &races).unwrap();
        // entry(1) never started, so the three finishers advance.
        assert_eq!(plan.advanced, vec![entry(4), entry(2), entry(3)]);
        assert_eq!(plan.eliminated, vec![entry(1)]);
    }

    #[test]
    fn test_time_trial_seeds_repechage_when_configured() {
        let config = ProgressionConfig {
            has_repechage: true,
            time_trial_direct_advance: 2,
            time_trial_to_repechage: 4,
            knockout_advance: 2,
        };
        let event = event(Some(Phase::TimeTrial), EventStatus::InProgress, config);
        let races = vec![completed_race(
            Phase::TimeTrial,
            1,
            &[
                (entry(1), Some(400)),
                (entry(2), Some(401)),
                (entry(3), Some(402)),
                (entry(4), Some(403)),
                (entry(5), Some(404)),
                (entry(6), Some(405)),
            ],
        )];
        let plan = advance_time_trial(&event, 6, &races).unwrap();
        assert_eq!(plan.next_phase, Some(Phase::Repechage));
        // Only the repechage candidates race; direct qualifiers wait.
        let seeded = entry_ids(&plan);
        assert_eq!(seeded, vec![entry(3), entry(4), entry(5), entry(6)]);
        assert_eq!(plan.advanced.len(), 6);
        assert!(plan.eliminated.is_empty());
    }

    #[test]
    fn test_repechage_winners_merge_with_direct_qualifiers() {
        let config = ProgressionConfig {
            has_repechage: true,
            time_trial_direct_advance: 2,
            time_trial_to_repechage: 4,
            knockout_advance: 2,
        };
        let event = event(Some(Phase::Repechage), EventStatus::InProgress, config);
        let races = vec![
            completed_race(
                Phase::TimeTrial,
                1,
                &[
                    (entry(1), Some(400)),
                    (entry(2), Some(401)),
                    (entry(3), Some(402)),
                    (entry(4), Some(403)),
                    (entry(5), Some(404)),
                    (entry(6), Some(405)),
                ],
            ),
            completed_race(
                Phase::Repechage,
                1,
                &[
                    (entry(3), Some(415)),
                    (entry(4), Some(408)),
                    (entry(5), Some(406)),
                    (entry(6), Some(410)),
                ],
            ),
        ];
        let plan = advance_knockout(&event, Phase::Repechage, 6, &races).unwrap();
        assert_eq!(plan.next_phase, Some(Phase::FinalA));
        // Direct qualifiers 1 and 2 merge with repechage winners 5 and 4.
        assert_eq!(plan.advanced, vec![entry(1), entry(2), entry(5), entry(4)]);
        assert_eq!(plan.eliminated, vec![entry(6), entry(3)]);
    }

    #[test]
    fn test_reprocessing_advanced_phase_is_a_conflict() {
        let config = no_repechage(2);
        let event = event(Some(Phase::FinalA), EventStatus::InProgress, config);
        let races = vec![completed_race(
            Phase::TimeTrial,
            1,
            &[(entry(1), Some(400)), (entry(2), Some(405))],
        )];
        let err = advance_time_trial(&event, 6, &races).unwrap_err();
        match err {
            StorageError::StateConflict(msg) => assert!(msg.contains("already processed")),
            other => panic!("expected StateConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_unseeded_event_cannot_process() {
        let config = no_repechage(2);
        let event = event(None, EventStatus::Pending, config);
        let err = advance_time_trial(&event, 6, &[]).unwrap_err();
        assert!(matches!(err, StorageError::StateConflict(_)));
    }

    #[test]
    fn test_semifinal_fills_b_final_with_losers() {
        let config = ProgressionConfig {
            has_repechage: false,
            time_trial_direct_advance: 12,
            time_trial_to_repechage: 0,
            knockout_advance: 3,
        };
        let event = event(Some(Phase::Semifinal), EventStatus::InProgress, config);
        let heat1: Vec<(Uuid, Option<i64>)> =
            (1..=6).map(|n| (entry(n), Some(400 + n as i64))).collect();
        let heat2: Vec<(Uuid, Option<i64>)> =
            (7..=12).map(|n| (entry(n), Some(400 + n as i64))).collect();
        let races = vec![
            completed_race(Phase::Semifinal, 1, &heat1),
            completed_race(Phase::Semifinal, 2, &heat2),
        ];
        let plan = advance_knockout(&event, Phase::Semifinal, 6, &races).unwrap();
        assert_eq!(plan.next_phase, Some(Phase::FinalA));
        assert_eq!(plan.races.len(), 2);
        let final_b = plan.races.iter().find(|r| r.phase == Phase::FinalB).unwrap();
        let final_a = plan.races.iter().find(|r| r.phase == Phase::FinalA).unwrap();
        assert_eq!(final_a.lanes.len(), 6);
        assert_eq!(final_b.lanes.len(), 6);
        // Top three of each heat reach the A final.
        let a_entries: Vec<Uuid> = final_a.lanes.iter().map(|l| l.entry_id).collect();
        for n in [1, 2, 3, 7, 8, 9] {
            assert!(a_entries.contains(&entry(n)));
        }
    }

    #[test]
    fn test_finalize_assigns_medals_from_a_final() {
        let config = no_repechage(2);
        let event = event(Some(Phase::FinalA), EventStatus::InProgress, config);
        let races = vec![completed_race(
            Phase::FinalA,
            1,
            &[
                (entry(1), Some(402)),
                (entry(2), Some(399)),
                (entry(3), Some(405)),
                (entry(4), Some(410)),
            ],
        )];
        let plan = finalize(&event, &races).unwrap();
        assert_eq!(plan.event_status, EventStatus::Completed);
        let medals = plan.medals.unwrap();
        assert_eq!(medals.gold, Some(entry(2)));
        assert_eq!(medals.silver, Some(entry(1)));
        assert_eq!(medals.bronze, Some(entry(3)));
    }

    #[test]
    fn test_finalize_waits_for_b_final() {
        let config = no_repechage(2);
        let event = event(Some(Phase::FinalA), EventStatus::InProgress, config);
        let races = vec![
            completed_race(Phase::FinalA, 1, &[(entry(1), Some(400)), (entry(2), Some(401))]),
            race_with_status(
                Phase::FinalB,
                1,
                &[(entry(3), None), (entry(4), None)],
                RaceStatus::Scheduled,
            ),
        ];
        let err = finalize(&event, &races).unwrap_err();
        assert!(matches!(err, StorageError::StateConflict(_)));
    }

    #[test]
    fn test_completed_event_rejects_any_processing() {
        let config = no_repechage(2);
        let event = event(Some(Phase::FinalA), EventStatus::Completed, config);
        let err = finalize(&event, &[]).unwrap_err();
        match err {
            StorageError::StateConflict(msg) => assert!(msg.contains("completed")),
            other => panic!("expected StateConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_phase_for_field_thresholds() {
        assert_eq!(phase_for_field(2, 6).unwrap(), Phase::FinalA);
        assert_eq!(phase_for_field(6, 6).unwrap(), Phase::FinalA);
        assert_eq!(phase_for_field(7, 6).unwrap(), Phase::Semifinal);
        assert_eq!(phase_for_field(12, 6).unwrap(), Phase::Semifinal);
        assert_eq!(phase_for_field(13, 6).unwrap(), Phase::Quarterfinal);
        assert!(phase_for_field(25, 6).is_err());
        assert!(phase_for_field(0, 6).is_err());
    }

    #[test]
    fn test_serpentine_distribution() {
        let pool: Vec<Uuid> = (1..=8).map(entry).collect();
        let heats = distribute_serpentine(&pool, 2);
        assert_eq!(heats[0], vec![entry(1), entry(4), entry(5), entry(8)]);
        assert_eq!(heats[1], vec![entry(2), entry(3), entry(6), entry(7)]);
    }
}
