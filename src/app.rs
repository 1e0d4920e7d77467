use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/journal", get(handlers::journal))
        .route("/journal/entries", post(handlers::create_entry))
        .route("/journal/entries/:id/delete", post(handlers::delete_entry))
        .route("/journal/clear", post(handlers::clear_entries))
        .route("/journal/demo", post(handlers::generate_demo))
        .route("/library", get(handlers::library))
        .route("/library/:id/save", post(handlers::toggle_save))
        .route("/api/calendar", get(handlers::api_calendar))
        .route("/api/journal", get(handlers::api_journal))
        .route("/api/library/:id/save", post(handlers::api_toggle_save))
        .with_state(state)
}
