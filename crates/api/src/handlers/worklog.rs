//! Handlers for the `/worklogs` resource.
//!
//! Listing and creation are nested under the owning task:
//! `/tasks/{id}/worklogs`. Single-worklog operations live at
//! `/worklogs/{id}`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pm_core::error::CoreError;
use pm_core::types::DbId;
use pm_db::models::worklog::{CreateWorklog, UpdateWorklog, Worklog};
use pm_db::repositories::WorklogRepo;
use validator::Validate;

use super::ensure_task_exists;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::WorklogList;
use crate::state::AppState;

/// POST /api/tasks/{id}/worklogs
pub async fn create(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateWorklog>,
) -> AppResult<(StatusCode, Json<Worklog>)> {
    input.validate()?;
    ensure_task_exists(&state.pool, task_id).await?;
    let worklog = WorklogRepo::create(&state.pool, task_id, &input).await?;
    Ok((StatusCode::CREATED, Json(worklog)))
}

/// GET /api/tasks/{id}/worklogs
pub async fn list_by_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<DbId>,
) -> AppResult<Json<WorklogList>> {
    ensure_task_exists(&state.pool, task_id).await?;
    let worklogs = WorklogRepo::list_by_task(&state.pool, task_id).await?;
    let total_hours = WorklogRepo::total_hours(&state.pool, task_id).await?;
    Ok(Json(WorklogList {
        worklogs,
        total_hours,
    }))
}

/// GET /api/worklogs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Worklog>> {
    let worklog = WorklogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Worklog",
            id,
        }))?;
    Ok(Json(worklog))
}

/// PUT /api/worklogs/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateWorklog>,
) -> AppResult<Json<Worklog>> {
    input.validate()?;
    let worklog = WorklogRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Worklog",
            id,
        }))?;
    Ok(Json(worklog))
}

/// DELETE /api/worklogs/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = WorklogRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Worklog",
            id,
        }))
    }
}
