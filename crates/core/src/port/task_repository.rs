// Task Repository Port (Interface)

use crate::domain::{Task, TaskId};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Repository interface for Task persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks, in the backing store's insertion order
    async fn find_all(&self) -> Result<Vec<Task>>;

    /// Find task by ID
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Insert a new task and return the stored representation
    async fn save(&self, task: Task) -> Result<Task>;

    /// Replace the stored fields of an existing task (keyed by id)
    ///
    /// Callers check existence first; a row that vanished in between
    /// yields `AppError::NotFound`.
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete by ID. True iff a record existed and was removed.
    async fn delete(&self, id: &TaskId) -> Result<bool>;
}

/// In-process repository (tests, `database.backend = "memory"`)
///
/// Keeps insertion order; lookups are linear, which is fine for the
/// sizes this backend is meant for.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| &t.id == id).cloned())
    }

    async fn save(&self, task: Task) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(AppError::Database(format!(
                "Unique constraint violation: task {} already exists",
                task.id
            )));
        }
        tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(task)
            }
            None => Err(AppError::task_not_found(task.id)),
        }
    }

    async fn delete(&self, id: &TaskId) -> Result<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        Ok(tasks.len() < before)
    }
}
