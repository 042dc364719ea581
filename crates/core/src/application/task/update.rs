// Update Task Use Case

use crate::domain::{Task, TaskId, TaskPatch};
use crate::error::{AppError, Result};
use crate::port::{TaskRepository, TimeProvider};
use tracing::info;

/// Execute update use case (fetch, mutate, persist)
///
/// Two round trips: a concurrent delete between them surfaces as
/// `NotFound` from the repository.
pub async fn execute(
    repo: &dyn TaskRepository,
    time_provider: &dyn TimeProvider,
    id: &TaskId,
    patch: TaskPatch,
) -> Result<Task> {
    let mut task = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::task_not_found(id.as_str()))?;

    task.update(patch, time_provider.now());

    let stored = repo.update(task).await?;
    info!(task_id = %stored.id, status = %stored.status, "Task updated");

    Ok(stored)
}
