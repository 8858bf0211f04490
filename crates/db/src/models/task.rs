//! Task entity model and DTOs.
//!
//! Tasks form a tree per project through `parent_id`, and may optionally be
//! attached to a milestone of the same project.

use pm_core::serde_helpers::double_option;
use pm_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::{TaskPriority, TaskStatus};
use crate::models::MAX_HOURS;

/// A task row from the `tasks` table.
///
/// Hour columns are `NUMERIC(10, 2)` in the database and are read back as
/// `f64` via a cast in the repository's column list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub parent_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
    pub wbs_code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task. The owning project comes from the URL.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTask {
    pub parent_id: Option<DbId>,
    pub milestone_id: Option<DbId>,
    #[validate(length(max = 50))]
    pub wbs_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `not_started` if omitted.
    pub status: Option<TaskStatus>,
    /// Defaults to `medium` if omitted.
    pub priority: Option<TaskPriority>,
    #[validate(length(max = 255))]
    pub assignee: Option<String>,
    #[validate(range(min = 0.0, max = MAX_HOURS))]
    pub estimated_hours: Option<f64>,
    #[validate(range(min = 0.0, max = MAX_HOURS))]
    pub actual_hours: Option<f64>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Defaults to 0 if omitted.
    pub sort_order: Option<i32>,
}

/// DTO for partially updating a task.
///
/// `parent_id: null` moves the task to the root of its project;
/// `milestone_id: null` detaches it from its milestone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTask {
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub milestone_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub wbs_code: Option<Option<String>>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 0.0, max = MAX_HOURS))]
    pub estimated_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 0.0, max = MAX_HOURS))]
    pub actual_hours: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<Date>>,
    pub sort_order: Option<i32>,
}

impl UpdateTask {
    /// Whether this update touches the task's position in the hierarchy.
    pub fn changes_hierarchy(&self) -> bool {
        self.parent_id.is_some() || matches!(self.milestone_id, Some(Some(_)))
    }
}
