//! Worklog entity model and DTOs.

use pm_core::serde_helpers::double_option;
use pm_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::MAX_HOURS;

/// A worklog row from the `worklogs` table: hours spent on a task on a day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Worklog {
    pub id: DbId,
    pub task_id: DbId,
    pub user_name: String,
    pub hours: f64,
    pub work_date: Date,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a worklog. The owning task comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorklog {
    #[validate(length(min = 1, max = 255))]
    pub user_name: String,
    #[validate(range(exclusive_min = 0.0, max = MAX_HOURS))]
    pub hours: f64,
    pub work_date: Date,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWorklog {
    #[validate(length(min = 1, max = 255))]
    pub user_name: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = MAX_HOURS))]
    pub hours: Option<f64>,
    pub work_date: Option<Date>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}
