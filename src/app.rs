use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/form/field", post(handlers::set_field))
        .route("/tasks", post(handlers::submit_task))
        .route("/tasks/:id/action", post(handlers::task_action))
        .route("/tasks/:id/delete", post(handlers::delete_task))
        .route("/filter", post(handlers::set_filter))
        .route("/api/board", get(handlers::get_board))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/tasks", post(handlers::create_task))
        .route("/api/tasks/:id", delete(handlers::remove_task))
        .route("/api/tasks/:id/advance", post(handlers::advance_task))
        .route("/api/tasks/:id/reset", post(handlers::reset_task))
        .with_state(state)
}
