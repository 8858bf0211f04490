//! Handlers for the `/tasks` resource.
//!
//! Listing, tree view and creation are nested under the owning project:
//! `/projects/{id}/tasks[/tree]`. Single-task operations live at
//! `/tasks/{id}`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pm_core::error::CoreError;
use pm_core::types::DbId;
use pm_db::models::task::{CreateTask, Task, UpdateTask};
use pm_db::repositories::TaskRepo;
use validator::Validate;

use super::{ensure_project_exists, ensure_task_exists};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::{TaskList, TaskTree};
use crate::state::AppState;

/// POST /api/projects/{id}/tasks
///
/// Rejects a `parent_id` or `milestone_id` that belongs to another project.
pub async fn create(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.validate()?;
    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/projects/{id}/tasks
pub async fn list_by_project(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
) -> AppResult<Json<TaskList>> {
    ensure_project_exists(&state.pool, project_id).await?;
    let tasks = TaskRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(TaskList { tasks }))
}

/// GET /api/projects/{id}/tasks/tree
pub async fn tree(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
) -> AppResult<Json<TaskTree>> {
    ensure_project_exists(&state.pool, project_id).await?;
    let tasks = TaskRepo::tree(&state.pool, project_id).await?;
    Ok(Json(TaskTree { tasks }))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Task>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// GET /api/tasks/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TaskList>> {
    ensure_task_exists(&state.pool, id).await?;
    let tasks = TaskRepo::list_children(&state.pool, id).await?;
    Ok(Json(TaskList { tasks }))
}

/// PUT /api/tasks/{id}
///
/// A `parent_id` that would put the task under its own subtree is
/// rejected with 400.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTask>,
) -> AppResult<Json<Task>> {
    input.validate()?;
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
///
/// Subtasks and worklogs are removed with the task.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TaskRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}
