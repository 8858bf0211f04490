//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Missing rows surface as
//! `Ok(None)` / `Ok(false)`; the HTTP layer turns those into 404s.

pub mod milestone_repo;
pub mod project_repo;
pub mod task_repo;
pub mod worklog_repo;

pub use milestone_repo::MilestoneRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::{TaskRepo, TaskWriteError};
pub use worklog_repo::WorklogRepo;

/// Split a clearable patch field into its `(provided, value)` bind pair.
///
/// Used with `CASE WHEN $n THEN $m ELSE column END` so that an explicit
/// `null` clears the column while an absent field leaves it unchanged.
pub(crate) fn patch<T: Copy>(field: Option<Option<T>>) -> (bool, Option<T>) {
    (field.is_some(), field.flatten())
}

/// [`patch`] for owned strings, borrowing the inner value.
pub(crate) fn patch_str(field: &Option<Option<String>>) -> (bool, Option<&str>) {
    (field.is_some(), field.as_ref().and_then(|v| v.as_deref()))
}
