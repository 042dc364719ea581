// Domain Layer - Pure business logic and entities

pub mod credentials;
pub mod error;
pub mod task;
pub mod validation;

// Re-exports
pub use credentials::Credentials;
pub use error::ValidationError;
pub use task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};
