//! Repository for the `worklogs` table.

use pm_core::types::DbId;
use sqlx::PgPool;

use crate::models::worklog::{CreateWorklog, UpdateWorklog, Worklog};
use crate::repositories::patch_str;

/// `hours` is `NUMERIC(10, 2)` and is cast so it decodes as `f64`.
const COLUMNS: &str = "id, task_id, user_name, hours::float8 AS hours, work_date, description, \
     created_at, updated_at";

/// Provides CRUD operations for worklogs.
pub struct WorklogRepo;

impl WorklogRepo {
    /// Insert a worklog under `task_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        input: &CreateWorklog,
    ) -> Result<Worklog, sqlx::Error> {
        let query = format!(
            "INSERT INTO worklogs (task_id, user_name, hours, work_date, description)
             VALUES ($1, $2, $3::numeric, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worklog>(&query)
            .bind(task_id)
            .bind(&input.user_name)
            .bind(input.hours)
            .bind(input.work_date)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Worklog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM worklogs WHERE id = $1");
        sqlx::query_as::<_, Worklog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a task's worklogs in insertion order.
    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Worklog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM worklogs
             WHERE task_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Worklog>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Sum of hours logged against a task (0 when there are none).
    pub async fn total_hours(pool: &PgPool, task_id: DbId) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar("SELECT COALESCE(SUM(hours), 0)::float8 FROM worklogs WHERE task_id = $1")
            .bind(task_id)
            .fetch_one(pool)
            .await
    }

    /// Update a worklog. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorklog,
    ) -> Result<Option<Worklog>, sqlx::Error> {
        let (set_description, description) = patch_str(&input.description);

        let query = format!(
            "UPDATE worklogs SET
                user_name = COALESCE($2, user_name),
                hours = COALESCE($3::numeric, hours),
                work_date = COALESCE($4, work_date),
                description = CASE WHEN $5 THEN $6 ELSE description END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Worklog>(&query)
            .bind(id)
            .bind(&input.user_name)
            .bind(input.hours)
            .bind(input.work_date)
            .bind(set_description)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a worklog. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM worklogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
