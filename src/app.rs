use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/draft/date", post(handlers::form_date))
        .route("/draft/rating", post(handlers::form_rating))
        .route("/draft/notes", post(handlers::form_notes))
        .route("/draft/toggle", post(handlers::form_toggle))
        .route("/draft/submit", post(handlers::form_submit))
        .route("/catalog/add", post(handlers::form_add_label))
        .route("/api/state", get(handlers::get_state))
        .route("/api/draft", post(handlers::update_draft))
        .route("/api/entries", get(handlers::get_entries).post(handlers::submit_entry))
        .route("/api/catalog/:kind", get(handlers::get_catalog).post(handlers::add_catalog_label))
        .route("/api/charts", get(handlers::get_charts))
        .with_state(state)
}
