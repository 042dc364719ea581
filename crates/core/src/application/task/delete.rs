// Delete Task Use Case

use crate::domain::TaskId;
use crate::error::{AppError, Result};
use crate::port::TaskRepository;
use tracing::{info, warn};

/// Execute delete use case (existence check, then delete)
pub async fn execute(repo: &dyn TaskRepository, id: &TaskId) -> Result<()> {
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::task_not_found(id.as_str()));
    }

    if !repo.delete(id).await? {
        // Removed by a concurrent request between the check and the delete
        warn!(task_id = %id, "Task vanished before delete");
        return Err(AppError::task_not_found(id.as_str()));
    }

    info!(task_id = %id, "Task deleted");
    Ok(())
}
