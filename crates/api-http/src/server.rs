//! HTTP Server
//!
//! Router assembly, CORS/trace layers and the TCP listener lifecycle.

use crate::error::{method_not_allowed, not_found};
use crate::handler::{
    create_task, delete_task, get_task, health, list_tasks, login, register, update_task,
};
use crate::state::AppState;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8000;

/// Allowed cross-origin callers
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins; `*` mirrors whatever origin the request carries
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            cors: CorsConfig::default(),
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Credentials cannot be combined with a literal "*"
    if config.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::mirror_request());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// Full application router with layers applied
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors));

    // Mirroring needs an Origin header; same-origin and non-browser callers
    // still get the wildcard
    let router = if cors.allows_any_origin() {
        router.layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
    } else {
        router
    };

    router.with_state(state)
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

/// Running server started by [`HttpServer::start`]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> io::Result<()> {
        // Receiver is gone only if the server already exited
        let _ = self.shutdown.send(());
        self.task.await.map_err(io::Error::other)?
    }
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    async fn bind(&self) -> io::Result<TcpListener> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "HTTP server listening"
        );
        Ok(listener)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        let app = router(self.state, &self.config.cors);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Bind and serve on a background task
    pub async fn start(self) -> io::Result<ServerHandle> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        let app = router(self.state, &self.config.cors);
        let (tx, rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
        });

        Ok(ServerHandle {
            local_addr,
            shutdown: tx,
            task,
        })
    }
}
