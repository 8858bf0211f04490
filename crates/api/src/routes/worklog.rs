use axum::routing::get;
use axum::Router;

use crate::handlers::worklog;
use crate::state::AppState;

/// Routes mounted at `/worklogs`.
///
/// ```text
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(worklog::get_by_id)
            .put(worklog::update)
            .delete(worklog::delete),
    )
}
