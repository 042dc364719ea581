// Task Service - Core use cases for task management

pub mod create;
pub mod delete;
pub mod update;

use crate::domain::{NewTask, Task, TaskId, TaskPatch};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TaskRepository, TimeProvider};
use std::sync::Arc;

/// Task Service
///
/// Orchestrates the task lifecycle over a [`TaskRepository`]. Inputs are
/// expected to be validated already; this layer raises only not-found and
/// whatever the repository reports.
pub struct TaskService {
    task_repo: Arc<dyn TaskRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl TaskService {
    pub fn new(
        task_repo: Arc<dyn TaskRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            task_repo,
            id_provider,
            time_provider,
        }
    }

    /// All tasks, unfiltered
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.task_repo.find_all().await
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::task_not_found(id.as_str()))
    }

    pub async fn create_task(&self, input: NewTask, created_by: &str) -> Result<Task> {
        create::execute(
            self.task_repo.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            input,
            created_by,
        )
        .await
    }

    pub async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        update::execute(
            self.task_repo.as_ref(),
            self.time_provider.as_ref(),
            id,
            patch,
        )
        .await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        delete::execute(self.task_repo.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;
    use crate::port::task_repository::MockTaskRepository;
    use crate::port::{InMemoryTaskRepository, ManualTimeProvider, UuidProvider};
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    fn setup() -> (TaskService, Arc<ManualTimeProvider>) {
        let clock = Arc::new(ManualTimeProvider::new(
            Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(),
        ));
        let service = TaskService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(UuidProvider),
            clock.clone(),
        );
        (service, clock)
    }

    fn with_mock(repo: MockTaskRepository) -> TaskService {
        TaskService::new(
            Arc::new(repo),
            Arc::new(UuidProvider),
            Arc::new(ManualTimeProvider::new(Utc::now())),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let (service, _) = setup();

        let task = service
            .create_task(NewTask::new("Buy milk"), "admin")
            .await
            .unwrap();

        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_by, "admin");
    }

    #[tokio::test]
    async fn test_create_ids_are_unique() {
        let (service, _) = setup();

        let mut ids = HashSet::new();
        for i in 0..50 {
            let task = service
                .create_task(NewTask::new(format!("Task {}", i)), "admin")
                .await
                .unwrap();
            assert!(ids.insert(task.id));
        }
        assert_eq!(service.list_tasks().await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_create_requires_principal() {
        let (service, _) = setup();
        let err = service
            .create_task(NewTask::new("Buy milk"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let (service, clock) = setup();
        let task = service
            .create_task(NewTask::new("Buy milk"), "admin")
            .await
            .unwrap();

        clock.advance(Duration::seconds(30));
        let updated = service
            .update_task(
                &task.id,
                TaskPatch {
                    status: Some(TaskStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.updated_at > task.updated_at);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.title, "Buy milk");
        assert_eq!(updated.status, TaskStatus::InProgress);

        let fetched = service.get_task(&task.id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found_for_get_update_delete() {
        let (service, _) = setup();
        let id = uuid::Uuid::new_v4().to_string();

        let err = service.get_task(&id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = service
            .update_task(
                &id,
                TaskPatch {
                    title: Some("Nope".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Task with id {} not found", id));

        let err = service.delete_task(&id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_task() {
        let (service, _) = setup();
        let task = service
            .create_task(NewTask::new("Buy milk"), "admin")
            .await
            .unwrap();

        service.delete_task(&task.id).await.unwrap();

        assert!(service.list_tasks().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_task(&task.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_race_reports_not_found() {
        // Existence check sees the task, but a concurrent request removed it
        let mut repo = MockTaskRepository::new();
        repo.expect_find_by_id().returning(|id| {
            Ok(Some(Task::new(
                id.clone(),
                NewTask::new("Raced"),
                "admin",
                Utc::now(),
            )))
        });
        repo.expect_delete().times(1).returning(|_| Ok(false));

        let service = with_mock(repo);
        let err = service.delete_task(&"gone".to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_database_errors_surface_without_retry() {
        let mut repo = MockTaskRepository::new();
        repo.expect_find_all()
            .times(1)
            .returning(|| Err(AppError::Database("connection reset".into())));

        let service = with_mock(repo);
        let err = service.list_tasks().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
