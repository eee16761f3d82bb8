use axum::{Router, routing::get};
use storage::Database;

use super::handlers::list_clubs;

pub fn routes() -> Router<Database> {
    Router::new().route("/clubs", get(list_clubs))
}
