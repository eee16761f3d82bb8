use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::event::CreateEventRequest;
use crate::error::{Result, StorageError};
use crate::models::{BoatClass, Event, EventStatus, Lane, Medals, Phase, Race, RaceWithLanes};
use crate::services::progression::NewRace;

const EVENT_COLUMNS: &str = "event_id, competition_id, stage_id, boat_class_id, category_id, \
     gender, status, current_phase, has_repechage, time_trial_direct_advance, \
     time_trial_to_repechage, knockout_advance, gold_entry_id, silver_entry_id, \
     bronze_entry_id, created_at";

const RACE_COLUMNS: &str = "race_id, event_id, phase, heat_number, status, created_at";

const LANE_COLUMNS: &str = "lane_id, race_id, lane_number, entry_id, finish_time, status, position";

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Event> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn list_by_competition(&self, competition_id: Uuid) -> Result<Vec<Event>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE competition_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, Event>(&query)
            .bind(competition_id)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn create(&self, req: &CreateEventRequest) -> Result<Event> {
        let query = format!(
            r#"
            INSERT INTO events (
                competition_id, stage_id, boat_class_id, category_id, gender,
                status, has_repechage, time_trial_direct_advance,
                time_trial_to_repechage, knockout_advance
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8, $9)
            RETURNING {EVENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(req.competition_id)
            .bind(req.stage_id)
            .bind(req.boat_class_id)
            .bind(req.category_id)
            .bind(req.gender)
            .bind(req.has_repechage)
            .bind(req.time_trial_direct_advance)
            .bind(req.time_trial_to_repechage)
            .bind(req.knockout_advance)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                let wrapped = StorageError::from(e);
                if wrapped.is_unique_violation() {
                    StorageError::ConstraintViolation(
                        "an event for this boat class, category and gender already exists in this stage".to_string(),
                    )
                } else if wrapped.is_foreign_key_violation() {
                    StorageError::validation("unknown competition, stage, boat class or category")
                } else {
                    wrapped
                }
            })
    }

    pub async fn load_races_with_lanes(&self, event_id: Uuid) -> Result<Vec<RaceWithLanes>> {
        let races_query = format!(
            "SELECT {RACE_COLUMNS} FROM races WHERE event_id = $1 ORDER BY phase, heat_number"
        );
        let races = sqlx::query_as::<_, Race>(&races_query)
            .bind(event_id)
            .fetch_all(self.pool)
            .await?;

        let lanes_query = format!(
            r#"
            SELECT {LANE_COLUMNS} FROM lanes
            WHERE race_id IN (SELECT race_id FROM races WHERE event_id = $1)
            ORDER BY race_id, lane_number
            "#
        );
        let lanes = sqlx::query_as::<_, Lane>(&lanes_query)
            .bind(event_id)
            .fetch_all(self.pool)
            .await?;

        Ok(assemble(races, lanes))
    }
}

fn assemble(races: Vec<Race>, lanes: Vec<Lane>) -> Vec<RaceWithLanes> {
    let mut by_race: std::collections::HashMap<Uuid, Vec<Lane>> = std::collections::HashMap::new();
    for lane in lanes {
        by_race.entry(lane.race_id).or_default().push(lane);
    }
    races
        .into_iter()
        .map(|race| {
            let lanes = by_race.remove(&race.race_id).unwrap_or_default();
            RaceWithLanes { race, lanes }
        })
        .collect()
}

/// Locks the event row for the duration of the surrounding transaction.
/// Progression is single-writer per event; every mutating operation goes
/// through this lock so read-then-write sequences cannot interleave.
pub async fn find_for_update(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
) -> Result<Event> {
    let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 FOR UPDATE");
    sqlx::query_as::<_, Event>(&query)
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)
}

pub async fn find_boat_class(
    tx: &mut Transaction<'_, Postgres>,
    boat_class_id: Uuid,
) -> Result<BoatClass> {
    sqlx::query_as::<_, BoatClass>(
        r#"
        SELECT boat_class_id, code, name, crew_size, lane_capacity, discipline,
               weight_class, gender_scope
        FROM boat_classes
        WHERE boat_class_id = $1
        "#,
    )
    .bind(boat_class_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StorageError::NotFound)
}

pub async fn load_races_with_lanes_tx(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
) -> Result<Vec<RaceWithLanes>> {
    let races_query = format!(
        "SELECT {RACE_COLUMNS} FROM races WHERE event_id = $1 ORDER BY phase, heat_number"
    );
    let races = sqlx::query_as::<_, Race>(&races_query)
        .bind(event_id)
        .fetch_all(&mut **tx)
        .await?;

    let lanes_query = format!(
        r#"
        SELECT {LANE_COLUMNS} FROM lanes
        WHERE race_id IN (SELECT race_id FROM races WHERE event_id = $1)
        ORDER BY race_id, lane_number
        "#
    );
    let lanes = sqlx::query_as::<_, Lane>(&lanes_query)
        .bind(event_id)
        .fetch_all(&mut **tx)
        .await?;

    Ok(assemble(races, lanes))
}

/// Inserts the races a phase transition generated, lanes included.
pub async fn insert_races(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
    planned: &[NewRace],
) -> Result<Vec<RaceWithLanes>> {
    let mut created = Vec::with_capacity(planned.len());
    for new_race in planned {
        let race_query = format!(
            r#"
            INSERT INTO races (event_id, phase, heat_number, status)
            VALUES ($1, $2, $3, 'scheduled')
            RETURNING {RACE_COLUMNS}
            "#
        );
        let race = sqlx::query_as::<_, Race>(&race_query)
            .bind(event_id)
            .bind(new_race.phase)
            .bind(new_race.heat_number)
            .fetch_one(&mut **tx)
            .await?;

        let mut lanes = Vec::with_capacity(new_race.lanes.len());
        for new_lane in &new_race.lanes {
            let lane_query = format!(
                r#"
                INSERT INTO lanes (race_id, lane_number, entry_id)
                VALUES ($1, $2, $3)
                RETURNING {LANE_COLUMNS}
                "#
            );
            let lane = sqlx::query_as::<_, Lane>(&lane_query)
                .bind(race.race_id)
                .bind(new_lane.lane_number)
                .bind(new_lane.entry_id)
                .fetch_one(&mut **tx)
                .await?;
            lanes.push(lane);
        }
        created.push(RaceWithLanes { race, lanes });
    }
    Ok(created)
}

/// Moves the event's phase/status forward and records medals when present.
/// `current_phase` only ever advances; the guards in the progression service
/// enforce that before this is called.
pub async fn apply_transition(
    tx: &mut Transaction<'_, Postgres>,
    event_id: Uuid,
    phase: Option<Phase>,
    status: EventStatus,
    medals: Option<Medals>,
) -> Result<()> {
    let medals = medals.unwrap_or_default();
    sqlx::query(
        r#"
        UPDATE events
        SET status = $2,
            current_phase = $3,
            gold_entry_id = COALESCE($4, gold_entry_id),
            silver_entry_id = COALESCE($5, silver_entry_id),
            bronze_entry_id = COALESCE($6, bronze_entry_id)
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .bind(status)
    .bind(phase)
    .bind(medals.gold)
    .bind(medals.silver)
    .bind(medals.bronze)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
