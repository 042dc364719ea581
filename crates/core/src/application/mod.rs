// Application Layer - Use Cases and Business Logic

pub mod auth;
pub mod task;

// Re-exports
pub use auth::AuthService;
pub use task::TaskService;
