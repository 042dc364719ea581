//! Taskdesk SDK - Rust Client Library
//!
//! Typed client for the Taskdesk HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use taskdesk_sdk::{TaskdeskClient, UpdateTaskRequest, TaskStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TaskdeskClient::new("http://127.0.0.1:8000")?;
//!     let token = client.login("admin", "password").await?;
//!     let client = client.with_token(token.token);
//!
//!     for task in client.list_tasks().await? {
//!         if task.status == TaskStatus::Pending {
//!             client
//!                 .update_task(&task.id, &UpdateTaskRequest {
//!                     status: Some(TaskStatus::InProgress),
//!                     ..Default::default()
//!                 })
//!                 .await?;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::TaskdeskClient;
pub use error::{Result, SdkError};
pub use types::{
    CreateTaskRequest, HealthResponse, Task, TaskStatus, TokenResponse, UpdateTaskRequest,
};
