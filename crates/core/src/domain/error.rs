// Domain Error Types

use std::collections::BTreeMap;
use thiserror::Error;

/// Validation failure with field-level details (field -> message)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl ValidationError {
    /// Failure naming a single field
    pub fn field(
        message: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let mut details = BTreeMap::new();
        details.insert(field.into(), detail.into());
        Self {
            message: message.into(),
            details,
        }
    }

    /// Whether `field` is one of the failing fields
    pub fn names(&self, field: &str) -> bool {
        self.details.contains_key(field)
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
