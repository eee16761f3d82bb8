use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::PaginationParams;

/// Query parameters for the athlete listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AthleteListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub club_id: Option<Uuid>,
}
