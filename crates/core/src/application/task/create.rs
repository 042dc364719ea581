// Create Task Use Case

use crate::domain::{NewTask, Task};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TaskRepository, TimeProvider};
use tracing::info;

/// Execute create use case
///
/// # Arguments
///
/// * `repo` - Task repository
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `input` - Validated create payload
/// * `created_by` - Subject of the verified principal
pub async fn execute(
    repo: &dyn TaskRepository,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    input: NewTask,
    created_by: &str,
) -> Result<Task> {
    if created_by.is_empty() {
        return Err(AppError::authentication("Invalid token payload"));
    }

    let task = Task::new(
        id_provider.generate_id(),
        input,
        created_by,
        time_provider.now(),
    );

    let stored = repo.save(task).await?;
    info!(task_id = %stored.id, created_by = %stored.created_by, "Task created");

    Ok(stored)
}
