// Central Error Type for the Application

use crate::domain::ValidationError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Client-safe message for persistence failures
pub const DATABASE_ERROR_MESSAGE: &str = "Database error occurred";

/// Client-safe message for anything outside the known kinds
pub const UNCLASSIFIED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Status classification of an error kind.
///
/// The transport layer maps each class to a status code; nothing below it
/// formats a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Unauthorized,
    Forbidden,
    Unprocessable,
    NotFound,
    Internal,
}

/// Application-level error type (closed set of domain error kinds)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{resource} with id {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn authentication(message: impl Into<String>) -> Self {
        AppError::Authentication(message.into())
    }

    pub fn task_not_found(id: impl Into<String>) -> Self {
        AppError::NotFound {
            resource: "Task",
            id: id.into(),
        }
    }

    pub fn classification(&self) -> ErrorClass {
        match self {
            AppError::Authentication(_) => ErrorClass::Unauthorized,
            AppError::Authorization(_) => ErrorClass::Forbidden,
            AppError::Validation(_) => ErrorClass::Unprocessable,
            AppError::NotFound { .. } => ErrorClass::NotFound,
            AppError::Database(_) | AppError::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Kind name reported to clients as the error `type`
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "AuthenticationError",
            AppError::Authorization(_) => "AuthorizationError",
            AppError::Validation(_) => "ValidationError",
            AppError::NotFound { .. } => "ResourceNotFoundError",
            AppError::Database(_) => "DatabaseError",
            AppError::Internal(_) => "UnclassifiedError",
        }
    }

    /// Message safe to echo to a client. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => DATABASE_ERROR_MESSAGE.to_string(),
            AppError::Internal(_) => UNCLASSIFIED_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Field-level details (validation errors only)
    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            AppError::Validation(e) if !e.details.is_empty() => Some(&e.details),
            _ => None,
        }
    }
}

// Untyped failures from adapters land in the catch-all kind
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization error: {}", err))
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database(String)
