use axum::{Json, extract::State};
use storage::{Database, models::Club};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/clubs",
    responses(
        (status = 200, description = "Affiliated clubs", body = Vec<Club>)
    ),
    tag = "clubs"
)]
pub async fn list_clubs(State(db): State<Database>) -> Result<Json<Vec<Club>>, WebError> {
    let clubs = services::list_clubs(db.pool()).await?;

    Ok(Json(clubs))
}
