use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::race::{LaneDetail, RaceDetail};
use crate::error::{Result, StorageError};
use crate::models::{Lane, LaneStatus, Race, RaceStatus, RaceWithLanes};

const RACE_COLUMNS: &str = "race_id, event_id, phase, heat_number, status, created_at";

const LANE_COLUMNS: &str = "lane_id, race_id, lane_number, entry_id, finish_time, status, position";

#[derive(FromRow)]
struct LaneDetailRow {
    lane_number: i32,
    entry_id: Uuid,
    display_name: String,
    short_code: String,
    finish_time: Option<Decimal>,
    status: Option<LaneStatus>,
    position: Option<i32>,
}

/// Repository for Race database operations
pub struct RaceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RaceRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, race_id: Uuid) -> Result<Race> {
        let query = format!("SELECT {RACE_COLUMNS} FROM races WHERE race_id = $1");
        sqlx::query_as::<_, Race>(&query)
            .bind(race_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn find_with_lanes(&self, race_id: Uuid) -> Result<RaceWithLanes> {
        let race = self.find_by_id(race_id).await?;
        let query = format!("SELECT {LANE_COLUMNS} FROM lanes WHERE race_id = $1 ORDER BY lane_number");
        let lanes = sqlx::query_as::<_, Lane>(&query)
            .bind(race_id)
            .fetch_all(self.pool)
            .await?;
        Ok(RaceWithLanes { race, lanes })
    }

    /// Race with lanes joined against entries and clubs for display.
    pub async fn find_detail(&self, race_id: Uuid) -> Result<RaceDetail> {
        let race = self.find_by_id(race_id).await?;
        let rows = sqlx::query_as::<_, LaneDetailRow>(
            r#"
            SELECT l.lane_number, l.entry_id, en.display_name, cl.short_code,
                   l.finish_time, l.status, l.position
            FROM lanes l
            INNER JOIN entries en ON en.entry_id = l.entry_id
            INNER JOIN clubs cl ON cl.club_id = en.club_id
            WHERE l.race_id = $1
            ORDER BY l.lane_number
            "#,
        )
        .bind(race_id)
        .fetch_all(self.pool)
        .await?;

        Ok(detail_from(race, rows))
    }

    pub async fn details_for_event(&self, event_id: Uuid) -> Result<Vec<RaceDetail>> {
        let races_query = format!(
            "SELECT {RACE_COLUMNS} FROM races WHERE event_id = $1 ORDER BY phase, heat_number"
        );
        let races = sqlx::query_as::<_, Race>(&races_query)
            .bind(event_id)
            .fetch_all(self.pool)
            .await?;

        let rows = sqlx::query_as::<_, RaceLaneDetailRow>(
            r#"
            SELECT l.race_id, l.lane_number, l.entry_id, en.display_name, cl.short_code,
                   l.finish_time, l.status, l.position
            FROM lanes l
            INNER JOIN races r ON r.race_id = l.race_id
            INNER JOIN entries en ON en.entry_id = l.entry_id
            INNER JOIN clubs cl ON cl.club_id = en.club_id
            WHERE r.event_id = $1
            ORDER BY l.race_id, l.lane_number
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        let mut by_race: std::collections::HashMap<Uuid, Vec<LaneDetailRow>> =
            std::collections::HashMap::new();
        for row in rows {
            by_race.entry(row.race_id).or_default().push(LaneDetailRow {
                lane_number: row.lane_number,
                entry_id: row.entry_id,
                display_name: row.display_name,
                short_code: row.short_code,
                finish_time: row.finish_time,
                status: row.status,
                position: row.position,
            });
        }

        Ok(races
            .into_iter()
            .map(|race| {
                let rows = by_race.remove(&race.race_id).unwrap_or_default();
                detail_from(race, rows)
            })
            .collect())
    }
}

#[derive(FromRow)]
struct RaceLaneDetailRow {
    race_id: Uuid,
    lane_number: i32,
    entry_id: Uuid,
    display_name: String,
    short_code: String,
    finish_time: Option<Decimal>,
    status: Option<LaneStatus>,
    position: Option<i32>,
}

fn detail_from(race: Race, rows: Vec<LaneDetailRow>) -> RaceDetail {
    RaceDetail {
        race_id: race.race_id,
        event_id: race.event_id,
        phase: race.phase,
        heat_number: race.heat_number,
        status: race.status,
        lanes: rows
            .into_iter()
            .map(|row| LaneDetail {
                lane_number: row.lane_number,
                entry_id: row.entry_id,
                entrant: row.display_name,
                club: row.short_code,
                finish_time: row.finish_time,
                status: row.status,
                position: row.position,
            })
            .collect(),
    }
}

pub async fn find_for_update(tx: &mut Transaction<'_, Postgres>, race_id: Uuid) -> Result<Race> {
    let query = format!("SELECT {RACE_COLUMNS} FROM races WHERE race_id = $1 FOR UPDATE");
    sqlx::query_as::<_, Race>(&query)
        .bind(race_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(StorageError::NotFound)
}

pub async fn load_lanes(tx: &mut Transaction<'_, Postgres>, race_id: Uuid) -> Result<Vec<Lane>> {
    let query = format!("SELECT {LANE_COLUMNS} FROM lanes WHERE race_id = $1 ORDER BY lane_number");
    Ok(sqlx::query_as::<_, Lane>(&query)
        .bind(race_id)
        .fetch_all(&mut **tx)
        .await?)
}

pub async fn store_lane_result(
    tx: &mut Transaction<'_, Postgres>,
    lane_id: Uuid,
    finish_time: Option<Decimal>,
    status: LaneStatus,
    position: Option<i32>,
) -> Result<()> {
    sqlx::query(
        "UPDATE lanes SET finish_time = $2, status = $3, position = $4 WHERE lane_id = $1",
    )
    .bind(lane_id)
    .bind(finish_time)
    .bind(status)
    .bind(position)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn mark_completed(tx: &mut Transaction<'_, Postgres>, race_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE races SET status = $2 WHERE race_id = $1")
        .bind(race_id)
        .bind(RaceStatus::Completed)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Races of an event keyed by phase for the bracket view.
pub fn group_by_phase(details: Vec<RaceDetail>) -> std::collections::BTreeMap<String, Vec<RaceDetail>> {
    let mut phases: std::collections::BTreeMap<String, Vec<RaceDetail>> =
        std::collections::BTreeMap::new();
    for detail in details {
        phases
            .entry(detail.phase.as_str().to_string())
            .or_default()
            .push(detail);
    }
    phases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;

    fn detail(phase: Phase, heat_number: i32) -> RaceDetail {
        RaceDetail {
            race_id: Uuid::new_v4(),
            event_id: Uuid::from_u128(1),
            phase,
            heat_number,
            status: RaceStatus::Scheduled,
            lanes: vec![],
        }
    }

    #[test]
    fn test_group_by_phase_keys_by_phase_name() {
        let grouped = group_by_phase(vec![
            detail(Phase::TimeTrial, 1),
            detail(Phase::TimeTrial, 2),
            detail(Phase::FinalA, 1),
        ]);
        assert_eq!(grouped["time_trial"].len(), 2);
        assert_eq!(grouped["final_a"].len(), 1);
    }
}
