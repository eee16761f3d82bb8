use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{get_race, record_results};

pub fn routes() -> Router<Database> {
    Router::new().route("/races/:id", get(get_race))
}

pub fn admin_routes() -> Router<Database> {
    Router::new().route("/races/:id/results", post(record_results))
}
