//! Route definitions for the `/projects` resource, including the
//! project-scoped milestone and task collections.

use axum::routing::get;
use axum::Router;

use crate::handlers::{milestone, project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
///
/// GET    /{id}/milestones     -> milestone::list_by_project
/// POST   /{id}/milestones     -> milestone::create
/// GET    /{id}/tasks          -> task::list_by_project
/// POST   /{id}/tasks          -> task::create
/// GET    /{id}/tasks/tree     -> task::tree
/// ```
///
/// The owning project's segment is named `{id}` everywhere so it does not
/// conflict with the single-project route.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route(
            "/{id}/milestones",
            get(milestone::list_by_project).post(milestone::create),
        )
        .route(
            "/{id}/tasks",
            get(task::list_by_project).post(task::create),
        )
        .route("/{id}/tasks/tree", get(task::tree))
}
