use axum::{
    Router,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    approve_entries, create_event, get_bracket, get_event, list_events, process_phase,
    seed_time_trial,
};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/:id", get(get_event))
        .route("/events/:id/bracket", get(get_bracket))
}

pub fn admin_routes() -> Router<Database> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/:id/time-trial", post(seed_time_trial))
        .route("/events/:id/process/:phase", post(process_phase))
        .route("/events/:id/entries/approve", post(approve_entries))
}
