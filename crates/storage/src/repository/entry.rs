use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::event::{BatchApprovalResponse, EntryFailure};
use crate::error::{Result, StorageError};
use crate::models::{BoatClass, EntryStatus, Event, Gender};

/// An entry loaded with its crew size, ready for eligibility checks.
#[derive(Debug, Clone, FromRow)]
pub struct SeedEntry {
    pub entry_id: Uuid,
    pub competition_id: Uuid,
    pub category_id: Uuid,
    pub boat_class_id: Uuid,
    pub gender: Gender,
    pub display_name: String,
    pub status: EntryStatus,
    pub crew_count: i64,
}

const SEED_ENTRY_QUERY: &str = r#"
    SELECT en.entry_id, en.competition_id, en.category_id, en.boat_class_id,
           en.gender, en.display_name, en.status,
           COUNT(ea.athlete_id) AS crew_count
    FROM entries en
    LEFT JOIN entry_athletes ea ON ea.entry_id = en.entry_id
"#;

/// Repository for CompetitionEntry database operations
pub struct EntryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EntryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Loads entries in stable seeding order (submission order) and verifies
    /// every requested id exists.
    pub async fn load_for_seeding(
        tx: &mut Transaction<'_, Postgres>,
        entry_ids: &[Uuid],
    ) -> Result<Vec<SeedEntry>> {
        let query = format!(
            "{SEED_ENTRY_QUERY}
            WHERE en.entry_id = ANY($1)
            GROUP BY en.entry_id
            ORDER BY en.submitted_at, en.entry_id"
        );
        let entries = sqlx::query_as::<_, SeedEntry>(&query)
            .bind(entry_ids)
            .fetch_all(&mut **tx)
            .await?;

        if entries.len() != dedup_count(entry_ids) {
            return Err(StorageError::validation("one or more entry ids are unknown"));
        }
        Ok(entries)
    }

    /// Category, gender and boat-class constraints for one entry against the
    /// event it would race in.
    pub fn check_eligibility(
        entry: &SeedEntry,
        event: &Event,
        boat_class: &BoatClass,
    ) -> std::result::Result<(), String> {
        if entry.status != EntryStatus::Approved {
            return Err("entry is not approved".to_string());
        }
        if entry.competition_id != event.competition_id {
            return Err("entry belongs to another competition".to_string());
        }
        if entry.category_id != event.category_id {
            return Err("entry category does not match the event".to_string());
        }
        if entry.boat_class_id != event.boat_class_id {
            return Err("entry boat class does not match the event".to_string());
        }
        if entry.gender != event.gender {
            return Err(format!(
                "entry gender {} does not match the event's {}",
                entry.gender, event.gender
            ));
        }
        if entry.crew_count != boat_class.crew_size as i64 {
            return Err(format!(
                "crew of {} does not match the boat class ({} seats)",
                entry.crew_count, boat_class.crew_size
            ));
        }
        Ok(())
    }

    /// Approves pending entries one at a time. Per-entry eligibility
    /// failures are collected so a partial failure leaves an enumerable
    /// remainder instead of a half-applied batch.
    pub async fn approve_batch(
        &self,
        event: &Event,
        boat_class: &BoatClass,
        entry_ids: &[Uuid],
    ) -> Result<BatchApprovalResponse> {
        let mut approved = Vec::new();
        let mut failures = Vec::new();

        for entry_id in entry_ids {
            match self.approve_one(event, boat_class, *entry_id).await {
                Ok(()) => approved.push(*entry_id),
                Err(StorageError::NotEligible(reason)) => failures.push(EntryFailure {
                    entry_id: *entry_id,
                    reason,
                }),
                Err(StorageError::NotFound) => failures.push(EntryFailure {
                    entry_id: *entry_id,
                    reason: "entry not found".to_string(),
                }),
                Err(other) => return Err(other),
            }
        }

        Ok(BatchApprovalResponse { approved, failures })
    }

    async fn approve_one(
        &self,
        event: &Event,
        boat_class: &BoatClass,
        entry_id: Uuid,
    ) -> Result<()> {
        let query = format!(
            "{SEED_ENTRY_QUERY}
            WHERE en.entry_id = $1
            GROUP BY en.entry_id"
        );
        let entry = sqlx::query_as::<_, SeedEntry>(&query)
            .bind(entry_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        if entry.status != EntryStatus::Pending {
            return Err(StorageError::not_eligible("entry is not pending approval"));
        }
        if entry.competition_id != event.competition_id
            || entry.category_id != event.category_id
            || entry.boat_class_id != event.boat_class_id
        {
            return Err(StorageError::not_eligible(
                "entry does not belong to this event slot",
            ));
        }
        if entry.gender != event.gender {
            return Err(StorageError::not_eligible(format!(
                "entry gender {} does not match the event's {}",
                entry.gender, event.gender
            )));
        }
        if entry.crew_count != boat_class.crew_size as i64 {
            return Err(StorageError::not_eligible(format!(
                "crew of {} does not match the boat class ({} seats)",
                entry.crew_count, boat_class.crew_size
            )));
        }

        sqlx::query("UPDATE entries SET status = 'approved' WHERE entry_id = $1")
            .bind(entry_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

fn dedup_count(ids: &[Uuid]) -> usize {
    let mut seen: Vec<Uuid> = ids.to_vec();
    seen.sort();
    seen.dedup();
    seen.len()
}
