//! Restart behaviour with a file-backed SQLite database

mod common;

use common::{repository, Backend, TestServer};
use taskdesk_sdk::{CreateTaskRequest, TaskStatus, UpdateTaskRequest};

#[tokio::test]
async fn test_tasks_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("taskdesk.db").display());

    let (created, token) = {
        let server = TestServer::start_with(repository(Backend::Sqlite, &url).await).await;
        let client = server.admin_client().await;

        let mut created = Vec::new();
        for i in 0..10 {
            let task = client
                .create_task(&CreateTaskRequest {
                    title: format!("Task number {}", i),
                    ..Default::default()
                })
                .await
                .unwrap();
            created.push(task);
        }
        let done = client
            .update_task(
                &created[0].id,
                &UpdateTaskRequest {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        created[0] = done;

        let token = client.token().unwrap().to_string();
        server.stop().await;
        (created, token)
    };

    let server = TestServer::start_with(repository(Backend::Sqlite, &url).await).await;

    // Same signing secret, so the old token is still accepted
    let client = server.client().with_token(token);
    let restored = client.list_tasks().await.unwrap();
    assert_eq!(restored, created);
    assert_eq!(restored[0].status, TaskStatus::Completed);

    server.stop().await;
}

#[tokio::test]
async fn test_memory_backend_starts_empty() {
    let server = TestServer::start(Backend::Memory).await;
    let client = server.admin_client().await;
    client
        .create_task(&CreateTaskRequest {
            title: "Ephemeral".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    server.stop().await;

    let server = TestServer::start(Backend::Memory).await;
    let client = server.admin_client().await;
    assert!(client.list_tasks().await.unwrap().is_empty());
    server.stop().await;
}
