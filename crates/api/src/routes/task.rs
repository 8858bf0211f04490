use axum::routing::get;
use axum::Router;

use crate::handlers::{task, worklog};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/children    -> list_children
/// GET    /{id}/worklogs    -> worklog::list_by_task
/// POST   /{id}/worklogs    -> worklog::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(task::get_by_id).put(task::update).delete(task::delete),
        )
        .route("/{id}/children", get(task::list_children))
        .route(
            "/{id}/worklogs",
            get(worklog::list_by_task).post(worklog::create),
        )
}
