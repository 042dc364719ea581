//! SDK Error Types

use std::collections::BTreeMap;
use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer carrying the server's error envelope
    #[error("API error ({status} {kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
        details: BTreeMap<String, String>,
    },
}

impl SdkError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
