use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/subjects", post(handlers::add_subject))
        .route(
            "/api/subjects/:id",
            put(handlers::edit_subject).delete(handlers::delete_subject),
        )
        .route(
            "/api/attendance",
            get(handlers::day_sheet)
                .put(handlers::mark_attendance)
                .delete(handlers::unmark_attendance),
        )
        .route("/api/settings", put(handlers::update_settings))
        .route("/api/export", get(handlers::export_data))
        .route("/api/import", post(handlers::import_data))
        .with_state(state)
}
