//! Repository for the `tasks` table.
//!
//! Writes that move a task within its project's hierarchy run in a
//! transaction holding a row lock on the owning project, so concurrent
//! parent changes in the same project are validated one at a time against
//! the current [`TaskForest`].

use pm_core::error::CoreError;
use pm_core::hierarchy::{build_tree, TaskForest, TreeNode};
use pm_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::repositories::{patch, patch_str};

/// Column list shared across queries. Hour columns are `NUMERIC` and are
/// cast so they decode as `f64`.
const COLUMNS: &str = "id, project_id, parent_id, milestone_id, wbs_code, name, description, \
     status, priority, assignee, \
     estimated_hours::float8 AS estimated_hours, actual_hours::float8 AS actual_hours, \
     start_date, end_date, sort_order, created_at, updated_at";

/// Failure of a task write that validates the hierarchy first.
#[derive(Debug, thiserror::Error)]
pub enum TaskWriteError {
    /// The requested parent or milestone is not acceptable.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD and hierarchy operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task under `project_id`, returning the created row.
    ///
    /// A supplied parent must be a task of the same project, and a supplied
    /// milestone must be a milestone of the same project. A missing project
    /// is reported as [`CoreError::NotFound`].
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, TaskWriteError> {
        let mut tx = pool.begin().await?;

        lock_project(&mut tx, project_id).await?;

        if let Some(parent_id) = input.parent_id {
            let forest = load_forest(&mut tx, project_id).await?;
            if !forest.contains(parent_id) {
                return Err(CoreError::Validation(format!(
                    "Parent task {parent_id} does not exist in this project"
                ))
                .into());
            }
        }
        if let Some(milestone_id) = input.milestone_id {
            ensure_milestone_in_project(&mut tx, project_id, milestone_id).await?;
        }

        let query = format!(
            "INSERT INTO tasks (project_id, parent_id, milestone_id, wbs_code, name, description,
                                status, priority, assignee, estimated_hours, actual_hours,
                                start_date, end_date, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6,
                     COALESCE($7, 'not_started'), COALESCE($8, 'medium'), $9,
                     $10::numeric, $11::numeric, $12, $13, COALESCE($14, 0))
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(input.parent_id)
            .bind(input.milestone_id)
            .bind(&input.wbs_code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(&input.assignee)
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.sort_order)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(task)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a task with this id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List a project's tasks ordered by `sort_order`, then insertion order.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = $1
             ORDER BY sort_order ASC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the direct children of a task in `sort_order`.
    pub async fn list_children(pool: &PgPool, parent_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE parent_id = $1
             ORDER BY sort_order ASC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// A project's tasks assembled into a forest. Siblings keep `sort_order`.
    pub async fn tree(pool: &PgPool, project_id: DbId) -> Result<Vec<TreeNode<Task>>, sqlx::Error> {
        let tasks = Self::list_by_project(pool, project_id).await?;
        Ok(build_tree(tasks, |t| (t.id, t.parent_id)))
    }

    /// Update a task. Only fields present in `input` are applied, and
    /// `updated_at` is always refreshed.
    ///
    /// A parent change is rejected when it would make the task its own
    /// ancestor or point outside the task's project; a milestone change is
    /// rejected when the milestone belongs to another project.
    ///
    /// Returns `Ok(None)` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, TaskWriteError> {
        let mut tx = pool.begin().await?;

        let project_id: Option<DbId> =
            sqlx::query_scalar("SELECT project_id FROM tasks WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(project_id) = project_id else {
            return Ok(None);
        };

        if input.changes_hierarchy() {
            lock_project(&mut tx, project_id).await?;

            if let Some(new_parent) = input.parent_id {
                let forest = load_forest(&mut tx, project_id).await?;
                forest.validate_parent(id, new_parent)?;
            }
            if let Some(Some(milestone_id)) = input.milestone_id {
                ensure_milestone_in_project(&mut tx, project_id, milestone_id).await?;
            }
        }

        let (set_parent, parent_id) = patch(input.parent_id);
        let (set_milestone, milestone_id) = patch(input.milestone_id);
        let (set_wbs, wbs_code) = patch_str(&input.wbs_code);
        let (set_description, description) = patch_str(&input.description);
        let (set_assignee, assignee) = patch_str(&input.assignee);
        let (set_estimated, estimated_hours) = patch(input.estimated_hours);
        let (set_actual, actual_hours) = patch(input.actual_hours);
        let (set_start, start_date) = patch(input.start_date);
        let (set_end, end_date) = patch(input.end_date);

        let query = format!(
            "UPDATE tasks SET
                parent_id = CASE WHEN $2 THEN $3 ELSE parent_id END,
                milestone_id = CASE WHEN $4 THEN $5 ELSE milestone_id END,
                wbs_code = CASE WHEN $6 THEN $7 ELSE wbs_code END,
                name = COALESCE($8, name),
                description = CASE WHEN $9 THEN $10 ELSE description END,
                status = COALESCE($11, status),
                priority = COALESCE($12, priority),
                assignee = CASE WHEN $13 THEN $14 ELSE assignee END,
                estimated_hours = CASE WHEN $15 THEN $16::numeric ELSE estimated_hours END,
                actual_hours = CASE WHEN $17 THEN $18::numeric ELSE actual_hours END,
                start_date = CASE WHEN $19 THEN $20 ELSE start_date END,
                end_date = CASE WHEN $21 THEN $22 ELSE end_date END,
                sort_order = COALESCE($23, sort_order),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(set_parent)
            .bind(parent_id)
            .bind(set_milestone)
            .bind(milestone_id)
            .bind(set_wbs)
            .bind(wbs_code)
            .bind(&input.name)
            .bind(set_description)
            .bind(description)
            .bind(input.status)
            .bind(input.priority)
            .bind(set_assignee)
            .bind(assignee)
            .bind(set_estimated)
            .bind(estimated_hours)
            .bind(set_actual)
            .bind(actual_hours)
            .bind(set_start)
            .bind(start_date)
            .bind(set_end)
            .bind(end_date)
            .bind(input.sort_order)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Delete a task. Subtasks and worklogs go with it through
    /// `ON DELETE CASCADE`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Take a row lock on the project, serializing hierarchy writes within it.
async fn lock_project(conn: &mut PgConnection, project_id: DbId) -> Result<(), TaskWriteError> {
    let locked: Option<DbId> = sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?;
    match locked {
        Some(_) => Ok(()),
        None => Err(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }
        .into()),
    }
}

/// Load the `(id, parent_id)` arena for every task of a project.
async fn load_forest(conn: &mut PgConnection, project_id: DbId) -> Result<TaskForest, sqlx::Error> {
    let links: Vec<(DbId, Option<DbId>)> =
        sqlx::query_as("SELECT id, parent_id FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(TaskForest::new(links))
}

async fn ensure_milestone_in_project(
    conn: &mut PgConnection,
    project_id: DbId,
    milestone_id: DbId,
) -> Result<(), TaskWriteError> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM milestones WHERE id = $1 AND project_id = $2)",
    )
    .bind(milestone_id)
    .bind(project_id)
    .fetch_one(&mut *conn)
    .await?;
    if found {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Milestone {milestone_id} does not exist in this project"
        ))
        .into())
    }
}
