use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_athlete, list_athletes};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/athletes", get(list_athletes))
        .route("/athletes/:id", get(get_athlete))
}
