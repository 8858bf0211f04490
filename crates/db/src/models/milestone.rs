//! Milestone entity model and DTOs.

use pm_core::serde_helpers::double_option;
use pm_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::MilestoneStatus;

/// A milestone row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub due_date: Option<Date>,
    pub status: MilestoneStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a milestone. The owning project comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMilestone {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub due_date: Option<Date>,
    /// Defaults to `pending` if omitted.
    pub status: Option<MilestoneStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMilestone {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<Date>>,
    pub status: Option<MilestoneStatus>,
}
