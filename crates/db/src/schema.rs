//! Schema bootstrap.
//!
//! The schema is a fixed, ordered list of idempotent statements applied at
//! every startup. Later statements depend on earlier ones (foreign keys
//! reference tables created before them), so the order is significant:
//! extension, `projects`, `milestones`, `tasks`, `worklogs`, then indexes.

use sqlx::PgPool;

/// Tables in creation (dependency) order.
pub const TABLES: [&str; 4] = ["projects", "milestones", "tasks", "worklogs"];

/// Ordered DDL. Every statement is guarded so re-running it is a no-op.
pub const MIGRATIONS: &[&str] = &[
    r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#,
    "CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        name VARCHAR(255) NOT NULL,
        description TEXT,
        status VARCHAR(50) NOT NULL DEFAULT 'planning'
            CONSTRAINT ck_projects_status
            CHECK (status IN ('planning', 'in_progress', 'completed', 'on_hold')),
        start_date DATE,
        end_date DATE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS milestones (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        name VARCHAR(255) NOT NULL,
        due_date DATE,
        status VARCHAR(50) NOT NULL DEFAULT 'pending'
            CONSTRAINT ck_milestones_status
            CHECK (status IN ('pending', 'completed')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        parent_id UUID REFERENCES tasks(id) ON DELETE CASCADE,
        milestone_id UUID REFERENCES milestones(id) ON DELETE SET NULL,
        wbs_code VARCHAR(50),
        name VARCHAR(255) NOT NULL,
        description TEXT,
        status VARCHAR(50) NOT NULL DEFAULT 'not_started'
            CONSTRAINT ck_tasks_status
            CHECK (status IN ('not_started', 'in_progress', 'completed', 'blocked')),
        priority VARCHAR(20) NOT NULL DEFAULT 'medium'
            CONSTRAINT ck_tasks_priority
            CHECK (priority IN ('low', 'medium', 'high')),
        assignee VARCHAR(255),
        estimated_hours NUMERIC(10, 2),
        actual_hours NUMERIC(10, 2),
        start_date DATE,
        end_date DATE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT ck_tasks_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id)
    )",
    "CREATE TABLE IF NOT EXISTS worklogs (
        id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
        task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        user_name VARCHAR(255) NOT NULL,
        hours NUMERIC(10, 2) NOT NULL
            CONSTRAINT ck_worklogs_hours_positive CHECK (hours > 0),
        work_date DATE NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_milestones_project_id ON milestones(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_parent_id ON tasks(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_milestone_id ON tasks(milestone_id)",
    "CREATE INDEX IF NOT EXISTS idx_worklogs_task_id ON worklogs(task_id)",
    "CREATE INDEX IF NOT EXISTS idx_worklogs_work_date ON worklogs(work_date)",
];

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Statement `index` of [`MIGRATIONS`] failed. Earlier statements stay applied.
    #[error("Migration statement {index} failed: {source}")]
    Migration {
        index: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("Dropping table {table} failed: {source}")]
    Drop {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// Apply [`MIGRATIONS`] in order, stopping at the first failure.
///
/// There is no rollback of statements that already succeeded; the caller
/// treats any error as fatal and refuses to serve traffic.
pub async fn migrate(pool: &PgPool) -> Result<(), SchemaError> {
    tracing::info!(statements = MIGRATIONS.len(), "Running schema migrations");

    for (index, statement) in MIGRATIONS.iter().enumerate() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|source| SchemaError::Migration { index, source })?;
        tracing::debug!(index, "Applied migration statement");
    }

    tracing::info!("Schema migrations completed");
    Ok(())
}

/// Drop every table in reverse dependency order.
///
/// Development and test use only. Whether it may run against the current
/// environment is decided by the caller.
pub async fn drop_all(pool: &PgPool) -> Result<(), SchemaError> {
    tracing::warn!("Dropping all tables");

    for table in TABLES.into_iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .execute(pool)
            .await
            .map_err(|source| SchemaError::Drop { table, source })?;
        tracing::debug!(table, "Dropped table");
    }

    tracing::info!("All tables dropped");
    Ok(())
}
