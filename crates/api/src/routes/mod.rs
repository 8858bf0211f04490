pub mod health;
pub mod milestone;
pub mod project;
pub mod task;
pub mod worklog;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list, create
/// /projects/{id}                     get, update, delete
/// /projects/{id}/milestones          list, create
/// /projects/{id}/tasks               list, create
/// /projects/{id}/tasks/tree          nested task tree
///
/// /milestones/{id}                   get, update, delete
///
/// /tasks/{id}                        get, update, delete
/// /tasks/{id}/children               direct subtasks
/// /tasks/{id}/worklogs               list, create
///
/// /worklogs/{id}                     get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/milestones", milestone::router())
        .nest("/tasks", task::router())
        .nest("/worklogs", worklog::router())
}
