pub mod milestone;
pub mod project;
pub mod task;
pub mod worklog;

use pm_core::error::CoreError;
use pm_core::types::DbId;
use pm_db::repositories::{ProjectRepo, TaskRepo};
use pm_db::DbPool;

use crate::error::{AppError, AppResult};

/// Resolve a nested route's owning project, failing with 404 if it is missing.
pub(crate) async fn ensure_project_exists(pool: &DbPool, project_id: DbId) -> AppResult<()> {
    if ProjectRepo::exists(pool, project_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
    }
}

/// Resolve a nested route's owning task, failing with 404 if it is missing.
pub(crate) async fn ensure_task_exists(pool: &DbPool, task_id: DbId) -> AppResult<()> {
    if TaskRepo::exists(pool, task_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))
    }
}
