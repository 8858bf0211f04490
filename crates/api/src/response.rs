//! Response envelope types for API handlers.
//!
//! Collections are wrapped in an object keyed by the resource name
//! (`{ "projects": [...] }`) rather than returned as bare arrays.

use pm_core::hierarchy::TreeNode;
use pm_db::models::milestone::Milestone;
use pm_db::models::project::Project;
use pm_db::models::task::Task;
use pm_db::models::worklog::Worklog;
use serde::Serialize;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct MilestoneList {
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// A project's tasks nested by parent. Each node carries a `children` array.
#[derive(Debug, Serialize)]
pub struct TaskTree {
    pub tasks: Vec<TreeNode<Task>>,
}

/// A task's worklogs plus the sum of their hours.
#[derive(Debug, Serialize)]
pub struct WorklogList {
    pub worklogs: Vec<Worklog>,
    pub total_hours: f64,
}
