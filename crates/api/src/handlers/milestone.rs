//! Handlers for the `/milestones` resource.
//!
//! Listing and creation are nested under the owning project:
//! `/projects/{id}/milestones`. Single-milestone operations live at
//! `/milestones/{id}`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use pm_core::error::CoreError;
use pm_core::types::DbId;
use pm_db::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use pm_db::repositories::MilestoneRepo;
use validator::Validate;

use super::ensure_project_exists;
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::MilestoneList;
use crate::state::AppState;

/// POST /api/projects/{id}/milestones
pub async fn create(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateMilestone>,
) -> AppResult<(StatusCode, Json<Milestone>)> {
    input.validate()?;
    ensure_project_exists(&state.pool, project_id).await?;
    let milestone = MilestoneRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(milestone)))
}

/// GET /api/projects/{id}/milestones
pub async fn list_by_project(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
) -> AppResult<Json<MilestoneList>> {
    ensure_project_exists(&state.pool, project_id).await?;
    let milestones = MilestoneRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(MilestoneList { milestones }))
}

/// GET /api/milestones/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Milestone>> {
    let milestone = MilestoneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    Ok(Json(milestone))
}

/// PUT /api/milestones/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateMilestone>,
) -> AppResult<Json<Milestone>> {
    input.validate()?;
    let milestone = MilestoneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))?;
    Ok(Json(milestone))
}

/// DELETE /api/milestones/{id}
///
/// Tasks attached to the milestone are kept and detached.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = MilestoneRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }))
    }
}
