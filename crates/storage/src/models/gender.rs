use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gender scope used by categories, boat classes and events. Athletes carry
/// `Men` or `Women`; `Mixed` only ever appears as a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
pub enum Gender {
    Men,
    Women,
    Mixed,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Mixed => "mixed",
        }
    }

    /// Whether an athlete of gender `athlete` may race under this scope.
    pub fn admits(&self, athlete: Gender) -> bool {
        match self {
            Self::Mixed => true,
            scope => *scope == athlete,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
