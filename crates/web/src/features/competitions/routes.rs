use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_competition, list_competitions, list_stages};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/competitions", get(list_competitions))
        .route("/competitions/:slug", get(get_competition))
        .route("/competitions/:slug/stages", get(list_stages))
}
