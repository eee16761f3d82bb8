use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
}

/// Knockout phases in their fixed progression order. The variant order is
/// load-bearing: `current_phase` may only move to a strictly greater phase.
/// The B final races before the A final but both belong to the terminal slot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "race_phase", rename_all = "snake_case")]
pub enum Phase {
    TimeTrial,
    Repechage,
    Quarterfinal,
    Semifinal,
    FinalB,
    FinalA,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeTrial => "time_trial",
            Self::Repechage => "repechage",
            Self::Quarterfinal => "quarterfinal",
            Self::Semifinal => "semifinal",
            Self::FinalB => "final_b",
            Self::FinalA => "final_a",
        }
    }

    /// Phases an administrator can process. `FinalB` is never processed on
    /// its own; `process` on `FinalA` settles both finals.
    pub fn is_processable(&self) -> bool {
        !matches!(self, Self::FinalB)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advancement rules for one event, fixed at event creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ProgressionConfig {
    pub has_repechage: bool,
    pub time_trial_direct_advance: u32,
    pub time_trial_to_repechage: u32,
    pub knockout_advance: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct Medals {
    pub gold: Option<Uuid>,
    pub silver: Option<Uuid>,
    pub bronze: Option<Uuid>,
}

/// One boat-class × category × gender combination within a competition
/// stage. Owns its races; progression state lives here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: Uuid,
    pub competition_id: Uuid,
    pub stage_id: Uuid,
    pub boat_class_id: Uuid,
    pub category_id: Uuid,
    pub gender: Gender,
    pub status: EventStatus,
    pub current_phase: Option<Phase>,
    pub has_repechage: bool,
    pub time_trial_direct_advance: i32,
    pub time_trial_to_repechage: i32,
    pub knockout_advance: i32,
    pub gold_entry_id: Option<Uuid>,
    pub silver_entry_id: Option<Uuid>,
    pub bronze_entry_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
}

impl Event {
    pub fn progression(&self) -> ProgressionConfig {
        ProgressionConfig {
            has_repechage: self.has_repechage,
            time_trial_direct_advance: self.time_trial_direct_advance.max(0) as u32,
            time_trial_to_repechage: self.time_trial_to_repechage.max(0) as u32,
            knockout_advance: self.knockout_advance.max(0) as u32,
        }
    }

    pub fn medals(&self) -> Medals {
        Medals {
            gold: self.gold_entry_id,
            silver: self.silver_entry_id,
            bronze: self.bronze_entry_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_is_forward() {
        assert!(Phase::TimeTrial < Phase::Repechage);
        assert!(Phase::Repechage < Phase::Quarterfinal);
        assert!(Phase::Quarterfinal < Phase::Semifinal);
        assert!(Phase::Semifinal < Phase::FinalB);
        assert!(Phase::FinalB < Phase::FinalA);
    }

    #[test]
    fn test_final_b_is_not_processable() {
        assert!(!Phase::FinalB.is_processable());
        assert!(Phase::FinalA.is_processable());
        assert!(Phase::TimeTrial.is_processable());
    }
}
