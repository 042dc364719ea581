//! Shared harness: a real server on an ephemeral port

#![allow(dead_code)]

use chrono::Duration;
use std::sync::Arc;
use taskdesk_api_http::{AppState, CorsConfig, HttpServer, HttpServerConfig, ServerHandle};
use taskdesk_core::application::{AuthService, TaskService};
use taskdesk_core::domain::Credentials;
use taskdesk_core::port::{
    CredentialStore, InMemoryTaskRepository, SystemTimeProvider, TaskRepository, UuidProvider,
};
use taskdesk_infra_auth::{HmacTokenCodec, InMemoryCredentialStore, TokenAlgorithm};
use taskdesk_infra_sqlite::{create_pool, run_migrations, SqliteTaskRepository};
use taskdesk_sdk::TaskdeskClient;

pub const SECRET: &str = "integration-secret";

#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Sqlite,
    Memory,
}

pub const BACKENDS: [Backend; 2] = [Backend::Sqlite, Backend::Memory];

pub async fn repository(backend: Backend, url: &str) -> Arc<dyn TaskRepository> {
    match backend {
        Backend::Sqlite => {
            let pool = create_pool(url).await.unwrap();
            run_migrations(&pool).await.unwrap();
            Arc::new(SqliteTaskRepository::new(pool))
        }
        Backend::Memory => Arc::new(InMemoryTaskRepository::new()),
    }
}

pub struct TestServer {
    pub handle: ServerHandle,
    pub base_url: String,
}

impl TestServer {
    pub async fn start(backend: Backend) -> Self {
        Self::start_with(repository(backend, "sqlite::memory:").await).await
    }

    /// Demo account `admin`/`password` is seeded
    pub async fn start_with(task_repo: Arc<dyn TaskRepository>) -> Self {
        let clock = Arc::new(SystemTimeProvider);
        let store = Arc::new(InMemoryCredentialStore::new());
        store
            .put(&Credentials::new("admin", "password"))
            .await
            .unwrap();
        let codec = Arc::new(HmacTokenCodec::new(
            SECRET,
            TokenAlgorithm::Hs256,
            Duration::minutes(30),
        ));

        let state = AppState::new(
            Arc::new(TaskService::new(task_repo, Arc::new(UuidProvider), clock.clone())),
            Arc::new(AuthService::new(store, codec, clock)),
        );
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::default(),
        };

        let handle = HttpServer::new(config, state).start().await.unwrap();
        let base_url = format!("http://{}", handle.local_addr());
        Self { handle, base_url }
    }

    pub fn client(&self) -> TaskdeskClient {
        TaskdeskClient::new(&self.base_url).unwrap()
    }

    pub async fn admin_client(&self) -> TaskdeskClient {
        let client = self.client();
        let token = client.login("admin", "password").await.unwrap();
        client.with_token(token.token)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(self) {
        self.handle.stop().await.unwrap();
    }
}
