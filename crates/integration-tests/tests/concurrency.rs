//! Concurrent requests against one server

mod common;

use common::{TestServer, BACKENDS};
use std::collections::HashSet;
use taskdesk_sdk::{CreateTaskRequest, UpdateTaskRequest};

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    for backend in BACKENDS {
        let server = TestServer::start(backend).await;
        let client = server.admin_client().await;

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move {
                    client
                        .create_task(&CreateTaskRequest {
                            title: format!("Parallel task {}", i),
                            ..Default::default()
                        })
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }

        assert_eq!(client.list_tasks().await.unwrap().len(), 50, "{:?}", backend);
        server.stop().await;
    }
}

#[tokio::test]
async fn test_concurrent_update_and_delete_same_task() {
    for backend in BACKENDS {
        let server = TestServer::start(backend).await;
        let client = server.admin_client().await;

        let task = client
            .create_task(&CreateTaskRequest {
                title: "Contended".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let updater = {
            let client = client.clone();
            let id = task.id.clone();
            tokio::spawn(async move {
                client
                    .update_task(
                        &id,
                        &UpdateTaskRequest {
                            title: Some("Contended, renamed".to_string()),
                            ..Default::default()
                        },
                    )
                    .await
            })
        };
        let deleter = {
            let client = client.clone();
            let id = task.id.clone();
            tokio::spawn(async move { client.delete_task(&id).await })
        };

        // Either order is fine; a loser may only see 404
        if let Err(e) = updater.await.unwrap() {
            assert!(e.is_not_found(), "{:?}", e);
        }
        deleter.await.unwrap().unwrap();

        assert!(client.get_task(&task.id).await.unwrap_err().is_not_found());
        server.stop().await;
    }
}

#[tokio::test]
async fn test_concurrent_registrations() {
    let server = TestServer::start(common::Backend::Memory).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let client = server.client();
            tokio::spawn(async move {
                let username = format!("user{:02}", i);
                client.register(&username, "password1").await.unwrap();
                client.login(&username, "password1").await.is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }
    server.stop().await;
}
