// SQLite TaskRepository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use taskdesk_core::domain::{Task, TaskId, TaskStatus};
use taskdesk_core::error::{AppError, Result};
use taskdesk_core::port::TaskRepository;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract database-specific error code and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE / PRIMARY KEY constraint failed
                        AppError::Database(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "275" => {
                        // CHECK constraint failed
                        AppError::Database(format!(
                            "Check constraint violation: {}",
                            db_err.message()
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => {
                        // SQLITE_FULL - database or disk is full
                        AppError::Database(format!("Database full: {}", db_err.message()))
                    }
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as("SELECT * FROM tasks ORDER BY rowid ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(TaskRow::into_task).collect()
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn save(&self, task: Task) -> Result<Task> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, title, description, status, created_at, updated_at, created_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(&task.created_by)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        // id, created_at and created_by are immutable and never written here
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.updated_at)
        .bind(&task.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // Deleted between the caller's existence check and this write
        if result.rows_affected() == 0 {
            return Err(AppError::task_not_found(task.id));
        }

        Ok(task)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: String,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let status: TaskStatus = self.status.parse().map_err(|e| {
            AppError::Database(format!("Corrupt row for task {}: {}", self.id, e))
        })?;

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by,
        })
    }
}
