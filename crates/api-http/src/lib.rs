//! HTTP API Layer
//!
//! JSON-over-HTTP surface for Taskdesk: bearer-token auth, task CRUD and
//! the error envelope.

pub mod auth;
pub mod error;
pub mod handler;
pub mod server;
pub mod state;
pub mod types;

pub use server::{router, CorsConfig, HttpServer, HttpServerConfig, ServerHandle};
pub use state::AppState;
