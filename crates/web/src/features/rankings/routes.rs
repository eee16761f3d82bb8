use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{create_ranking_system, get_rankings, list_ranking_systems};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/competitions/:slug/rankings", get(get_rankings))
        .route("/competitions/:slug/ranking-systems", get(list_ranking_systems))
}

pub fn admin_routes() -> Router<Database> {
    Router::new().route("/ranking-systems", post(create_ranking_system))
}
