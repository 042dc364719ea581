//! Taskdesk Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    CreateTaskRequest, CredentialsRequest, ErrorEnvelope, HealthResponse, Task, TaskListResponse,
    TokenResponse, UpdateTaskRequest,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Taskdesk HTTP API Client
///
/// # Example
///
/// ```no_run
/// use taskdesk_sdk::{CreateTaskRequest, TaskdeskClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TaskdeskClient::new("http://127.0.0.1:8000")?;
/// let token = client.login("admin", "password").await?;
///
/// let client = client.with_token(token.token);
/// let task = client
///     .create_task(&CreateTaskRequest {
///         title: "Buy milk".to_string(),
///         ..Default::default()
///     })
///     .await?;
/// println!("Created {}", task.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TaskdeskClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl TaskdeskClient {
    /// Client for the server at `base_url` (e.g. `http://127.0.0.1:8000`)
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(SdkError::InvalidUrl(base_url));
        }

        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Attach a bearer token to every subsequent request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.send(self.request(Method::GET, "/health")).await
    }

    /// Exchange credentials for a token
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let body = CredentialsRequest { username, password };
        self.send(self.request(Method::POST, "/auth/login").json(&body))
            .await
    }

    /// Create (or overwrite) an account and receive a token for it
    pub async fn register(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let body = CredentialsRequest { username, password };
        self.send(self.request(Method::POST, "/auth/register").json(&body))
            .await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let list: TaskListResponse = self.send(self.request(Method::GET, "/tasks")).await?;
        Ok(list.tasks)
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        self.send(self.request(Method::GET, &format!("/tasks/{}", id)))
            .await
    }

    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task> {
        self.send(self.request(Method::POST, "/tasks").json(request))
            .await
    }

    pub async fn update_task(&self, id: &str, request: &UpdateTaskRequest) -> Result<Task> {
        self.send(self.request(Method::PUT, &format!("/tasks/{}", id)).json(request))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/tasks/{}", id))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Pass 2xx through; turn anything else into `SdkError::Api`
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    Err(decode_error(status, &body))
}

fn decode_error(status: StatusCode, body: &str) -> SdkError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => SdkError::Api {
            status: status.as_u16(),
            kind: envelope.error.kind,
            message: envelope.error.message,
            details: envelope.error.details,
        },
        // Not one of ours (proxy page, empty body)
        Err(_) => SdkError::Api {
            status: status.as_u16(),
            kind: "Unknown".to_string(),
            message: status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string(),
            details: BTreeMap::new(),
        },
    }
}
