// Port Layer - Interfaces for external dependencies

pub mod credential_store;
pub mod id_provider; // For deterministic testing
pub mod task_repository;
pub mod time_provider;
pub mod token_codec;

// Re-exports
pub use credential_store::CredentialStore;
pub use id_provider::{IdProvider, UuidProvider};
pub use task_repository::{InMemoryTaskRepository, TaskRepository};
pub use time_provider::{ManualTimeProvider, SystemTimeProvider, TimeProvider};
pub use token_codec::{Claims, IssuedToken, TokenCodec};
