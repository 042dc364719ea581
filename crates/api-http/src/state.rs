//! Shared handler state

use std::sync::Arc;
use taskdesk_core::application::{AuthService, TaskService};

/// Services injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(tasks: Arc<TaskService>, auth: Arc<AuthService>) -> Self {
        Self { tasks, auth }
    }
}
