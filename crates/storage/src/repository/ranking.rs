use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::ranking::CreateRankingSystemRequest;
use crate::error::{Result, StorageError};
use crate::models::{Gender, LaneStatus, RankingSystem};
use crate::services::ranking::{
    CategoryMeta, ClubRef, CrewRef, EntrantSnapshot, LaneSnapshot, RaceSnapshot,
};

const SYSTEM_COLUMNS: &str = "system_id, competition_id, name, group_by, entity_type, \
     scoring_mode, journey_mode, best_n_count, point_mode, max_scoring_position, \
     dnf_gets_points_if_few_finishers, created_at";

#[derive(FromRow)]
struct SnapshotRow {
    race_id: Uuid,
    stage_number: i32,
    stage_name: String,
    boat_class_id: Uuid,
    lane_capacity: i16,
    event_gender: Gender,
    category_id: Uuid,
    category_code: String,
    title_es: String,
    title_en: String,
    category_gender: Gender,
    masters: bool,
    lane_number: i32,
    finish_time: Option<Decimal>,
    lane_status: Option<LaneStatus>,
    entry_id: Uuid,
    display_name: String,
    club_id: Uuid,
    short_code: String,
    club_name: String,
}

#[derive(FromRow)]
struct CrewRow {
    entry_id: Uuid,
    athlete_id: Uuid,
    first_name: String,
    last_name: String,
}

#[derive(FromRow)]
struct PointRow {
    position: i32,
    points: i32,
}

pub struct RankingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RankingRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Systems available to a competition: its own plus federation-wide ones.
    pub async fn list_systems(&self, competition_id: Uuid) -> Result<Vec<RankingSystem>> {
        let query = format!(
            r#"
            SELECT {SYSTEM_COLUMNS} FROM ranking_systems
            WHERE competition_id IS NULL OR competition_id = $1
            ORDER BY name
            "#
        );
        Ok(sqlx::query_as::<_, RankingSystem>(&query)
            .bind(competition_id)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn find_system(&self, system_id: Uuid) -> Result<RankingSystem> {
        let query = format!("SELECT {SYSTEM_COLUMNS} FROM ranking_systems WHERE system_id = $1");
        sqlx::query_as::<_, RankingSystem>(&query)
            .bind(system_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn load_point_table(&self, system_id: Uuid) -> Result<Vec<(i32, i32)>> {
        let rows = sqlx::query_as::<_, PointRow>(
            r#"
            SELECT position, points FROM ranking_system_points
            WHERE system_id = $1
            ORDER BY position
            "#,
        )
        .bind(system_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| (r.position, r.points)).collect())
    }

    pub async fn create_system(&self, req: &CreateRankingSystemRequest) -> Result<RankingSystem> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO ranking_systems (
                competition_id, name, group_by, entity_type, scoring_mode,
                journey_mode, best_n_count, point_mode, max_scoring_position,
                dnf_gets_points_if_few_finishers
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {SYSTEM_COLUMNS}
            "#
        );
        let system = sqlx::query_as::<_, RankingSystem>(&query)
            .bind(req.competition_id)
            .bind(&req.name)
            .bind(req.group_by)
            .bind(req.entity_type)
            .bind(req.scoring_mode)
            .bind(req.journey_mode)
            .bind(req.best_n_count)
            .bind(req.point_mode)
            .bind(req.max_scoring_position)
            .bind(req.dnf_gets_points_if_few_finishers)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                let wrapped = StorageError::from(e);
                if wrapped.is_unique_violation() {
                    StorageError::ConstraintViolation(
                        "a ranking system with this name already exists".to_string(),
                    )
                } else {
                    wrapped
                }
            })?;

        for row in &req.point_table {
            sqlx::query(
                "INSERT INTO ranking_system_points (system_id, position, points) VALUES ($1, $2, $3)",
            )
            .bind(system.system_id)
            .bind(row.position)
            .bind(row.points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(system)
    }

    /// Every completed race of the competition as aggregation snapshots, with
    /// crew and club data resolved. Read-only over an as-of-now view.
    pub async fn load_race_snapshots(&self, competition_id: Uuid) -> Result<Vec<RaceSnapshot>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT r.race_id,
                   s.number AS stage_number, s.name AS stage_name,
                   e.boat_class_id, bc.lane_capacity, e.gender AS event_gender,
                   c.category_id, c.code AS category_code, c.title_es, c.title_en,
                   c.gender AS category_gender, c.masters,
                   l.lane_number, l.finish_time, l.status AS lane_status,
                   en.entry_id, en.display_name,
                   cl.club_id, cl.short_code, cl.name AS club_name
            FROM lanes l
            INNER JOIN races r ON r.race_id = l.race_id
            INNER JOIN events e ON e.event_id = r.event_id
            INNER JOIN stages s ON s.stage_id = e.stage_id
            INNER JOIN categories c ON c.category_id = e.category_id
            INNER JOIN boat_classes bc ON bc.boat_class_id = e.boat_class_id
            INNER JOIN entries en ON en.entry_id = l.entry_id
            INNER JOIN clubs cl ON cl.club_id = en.club_id
            WHERE e.competition_id = $1 AND r.status = 'completed'
            ORDER BY s.number, r.race_id, l.lane_number
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        let crew_rows = sqlx::query_as::<_, CrewRow>(
            r#"
            SELECT ea.entry_id, a.athlete_id, a.first_name, a.last_name
            FROM entry_athletes ea
            INNER JOIN athletes a ON a.athlete_id = ea.athlete_id
            INNER JOIN entries en ON en.entry_id = ea.entry_id
            WHERE en.competition_id = $1
            ORDER BY ea.entry_id, ea.seat
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        let mut crews: HashMap<Uuid, Vec<CrewRef>> = HashMap::new();
        for row in crew_rows {
            crews.entry(row.entry_id).or_default().push(CrewRef {
                athlete_id: row.athlete_id,
                name: format!("{} {}", row.first_name, row.last_name),
            });
        }

        let mut snapshots: Vec<RaceSnapshot> = Vec::new();
        let mut current_race: Option<Uuid> = None;
        for row in rows {
            let status = row.lane_status.ok_or_else(|| {
                StorageError::inconsistency(format!(
                    "completed race {} has an unrecorded lane",
                    row.race_id
                ))
            })?;
            let lane = LaneSnapshot {
                lane_number: row.lane_number,
                finish_time: row.finish_time,
                status,
                entrant: EntrantSnapshot {
                    entry_id: row.entry_id,
                    display_name: row.display_name.clone(),
                    club: ClubRef {
                        club_id: row.club_id,
                        short_code: row.short_code.clone(),
                        name: row.club_name.clone(),
                    },
                    crew: crews.get(&row.entry_id).cloned().unwrap_or_default(),
                },
            };

            if current_race != Some(row.race_id) {
                current_race = Some(row.race_id);
                snapshots.push(RaceSnapshot {
                    stage_number: row.stage_number,
                    stage_name: row.stage_name.clone(),
                    boat_class_id: row.boat_class_id,
                    lane_capacity: row.lane_capacity.max(0) as u32,
                    gender: row.event_gender,
                    category: CategoryMeta {
                        category_id: row.category_id,
                        code: row.category_code.clone(),
                        title_es: row.title_es.clone(),
                        title_en: row.title_en.clone(),
                        gender: row.category_gender,
                        masters: row.masters,
                    },
                    lanes: vec![lane],
                });
            } else if let Some(snapshot) = snapshots.last_mut() {
                snapshot.lanes.push(lane);
            }
        }

        Ok(snapshots)
    }
}
