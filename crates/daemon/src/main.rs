//! Taskdesk Server - Main Entry Point

mod config;
mod telemetry;

use anyhow::{Context, Result};
use chrono::Duration;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use crate::config::{Settings, StorageBackend};
use taskdesk_api_http::{AppState, CorsConfig, HttpServer, HttpServerConfig};
use taskdesk_core::application::{AuthService, TaskService};
use taskdesk_core::domain::Credentials;
use taskdesk_core::port::{
    CredentialStore, InMemoryTaskRepository, SystemTimeProvider, TaskRepository, UuidProvider,
};
use taskdesk_infra_auth::{HmacTokenCodec, InMemoryCredentialStore};
use taskdesk_infra_sqlite::{create_pool, run_migrations, SqliteTaskRepository};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (.env first so it can feed TASKDESK_* variables)
    dotenvy::dotenv().ok();
    let settings = Settings::load()?;

    // 2. Initialize logging
    telemetry::init_tracing(settings.log.format)?;
    info!("Taskdesk v{} starting...", VERSION);

    if settings.uses_default_secret() {
        warn!("auth.secret is the built-in default; set TASKDESK_AUTH__SECRET in production");
    }

    // 3. Setup dependencies (DI wiring)
    let state = build_state(&settings).await?;

    // 4. Serve until SIGINT/SIGTERM
    let server_config = HttpServerConfig {
        host: settings.server.host.clone(),
        port: settings.server.port,
        cors: CorsConfig {
            allowed_origins: settings.cors.allowed_origins.clone(),
        },
    };
    HttpServer::new(server_config, state)
        .serve(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete.");
    Ok(())
}

async fn build_task_repository(settings: &Settings) -> Result<Arc<dyn TaskRepository>> {
    match settings.database.backend {
        StorageBackend::Sqlite => {
            info!(url = %settings.database.url, "Initializing database...");
            let pool = create_pool(&settings.database.url)
                .await
                .context("DB pool creation failed")?;
            run_migrations(&pool).await.context("Migration failed")?;
            Ok(Arc::new(SqliteTaskRepository::new(pool)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory task storage; tasks are lost on restart");
            Ok(Arc::new(InMemoryTaskRepository::new()))
        }
    }
}

async fn build_state(settings: &Settings) -> Result<AppState> {
    let time_provider = Arc::new(SystemTimeProvider);
    let task_repo = build_task_repository(settings).await?;

    let credentials = Arc::new(InMemoryCredentialStore::new());
    if !settings.auth.demo_username.is_empty() {
        credentials
            .put(&Credentials::new(
                settings.auth.demo_username.clone(),
                settings.auth.demo_password.clone(),
            ))
            .await
            .context("Seeding demo account failed")?;
        info!(username = %settings.auth.demo_username, "Demo account seeded");
    }

    let codec = Arc::new(HmacTokenCodec::new(
        settings.auth.secret.clone().into_bytes(),
        settings.token_algorithm()?,
        Duration::minutes(settings.auth.token_ttl_minutes),
    ));

    let tasks = TaskService::new(task_repo, Arc::new(UuidProvider), time_provider.clone());
    let auth = AuthService::new(credentials, codec, time_provider);

    Ok(AppState::new(Arc::new(tasks), Arc::new(auth)))
}

/// Completes on SIGINT (Ctrl+C) or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        () = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn memory_settings(extra: &[(&str, &str)]) -> Settings {
        let mut env: HashMap<String, String> = extra
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert("TASKDESK_DATABASE__BACKEND".into(), "memory".into());
        Settings::load_from("does-not-exist/taskdesk", Some(env)).unwrap()
    }

    #[tokio::test]
    async fn test_demo_account_is_seeded() {
        let state = build_state(&memory_settings(&[])).await.unwrap();

        let token = state
            .auth
            .authenticate(&Credentials::new("admin", "password"))
            .await
            .unwrap();
        assert_eq!(state.auth.verify(&token.token).unwrap().subject, "admin");
        assert_eq!(token.expires_in, 30 * 60);
    }

    #[tokio::test]
    async fn test_empty_demo_username_disables_seeding() {
        let settings = memory_settings(&[("TASKDESK_AUTH__DEMO_USERNAME", "")]);
        let state = build_state(&settings).await.unwrap();

        assert!(state
            .auth
            .authenticate(&Credentials::new("admin", "password"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_sqlite_backend_wiring() {
        let mut settings = memory_settings(&[]);
        settings.database.backend = StorageBackend::Sqlite;
        settings.database.url = "sqlite::memory:".to_string();

        let state = build_state(&settings).await.unwrap();
        assert!(state.tasks.list_tasks().await.unwrap().is_empty());
    }
}
