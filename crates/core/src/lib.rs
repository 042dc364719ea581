// Taskdesk Core - Domain Logic & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, ErrorClass, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
