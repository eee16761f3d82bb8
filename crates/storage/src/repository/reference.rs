use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{BoatClass, Category};

/// Read-only lookups for the reference data events hang off: categories and
/// boat classes. Cross-aggregate references stay foreign-key style ids
/// resolved here rather than embedded object graphs.
pub struct ReferenceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReferenceRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_category(&self, category_id: Uuid) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, code, title_es, title_en, gender, masters, age_min, age_max
            FROM categories
            WHERE category_id = $1
            "#,
        )
        .bind(category_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_boat_class(&self, boat_class_id: Uuid) -> Result<BoatClass> {
        sqlx::query_as::<_, BoatClass>(
            r#"
            SELECT boat_class_id, code, name, crew_size, lane_capacity, discipline,
                   weight_class, gender_scope
            FROM boat_classes
            WHERE boat_class_id = $1
            "#,
        )
        .bind(boat_class_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
