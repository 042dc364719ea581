//! Payload validation
//!
//! Stateless checks run at the request boundary, before any field of a
//! payload is trusted. Every failure is a [`ValidationError`] whose details
//! name the offending field.

use super::credentials::Credentials;
use super::error::{Result, ValidationError};
use super::task::{NewTask, TaskId, TaskPatch, TaskStatus};
use serde_json::{Map, Value};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 6;

const UPDATABLE_FIELDS: [&str; 3] = ["title", "description", "status"];

pub fn validate_title(title: &str) -> Result<()> {
    let len = title.chars().count();

    if len == 0 {
        return Err(ValidationError::field(
            "Title is required",
            "title",
            "Title cannot be empty",
        ));
    }
    if len < TITLE_MIN_CHARS {
        return Err(ValidationError::field(
            "Title is too short",
            "title",
            format!("Title must have at least {} characters", TITLE_MIN_CHARS),
        ));
    }
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::field(
            "Title is too long",
            "title",
            format!("Title cannot exceed {} characters", TITLE_MAX_CHARS),
        ));
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<()> {
    match description {
        Some(d) if d.chars().count() > DESCRIPTION_MAX_CHARS => Err(ValidationError::field(
            "Description is too long",
            "description",
            format!(
                "Description cannot exceed {} characters",
                DESCRIPTION_MAX_CHARS
            ),
        )),
        _ => Ok(()),
    }
}

pub fn validate_status(status: Option<&str>) -> Result<Option<TaskStatus>> {
    let Some(raw) = status else {
        return Ok(None);
    };

    raw.parse::<TaskStatus>().map(Some).map_err(|_| {
        let allowed: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        ValidationError::field(
            "Invalid status",
            "status",
            format!("Status must be one of: {}", allowed.join(", ")),
        )
    })
}

/// Path-parameter task id. Returns the canonical (lowercase, hyphenated) form.
pub fn validate_task_id(task_id: &str) -> Result<TaskId> {
    uuid::Uuid::parse_str(task_id)
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| ValidationError::field("Invalid task ID", "task_id", "ID must be a valid UUID"))
}

pub fn validate_create_payload(payload: &Value) -> Result<NewTask> {
    let body = as_object(payload)?;

    if !body.contains_key("title") {
        return Err(ValidationError::field(
            "Missing required fields",
            "title",
            "Title is required",
        ));
    }

    let title = optional_string(body, "title", "Title")?.unwrap_or_default();
    let description = optional_string(body, "description", "Description")?;
    let status = optional_string(body, "status", "Status")?;

    validate_title(title)?;
    validate_description(description)?;
    let status = validate_status(status)?;

    Ok(NewTask {
        title: title.to_string(),
        description: description.unwrap_or_default().to_string(),
        status: status.unwrap_or_default(),
    })
}

pub fn validate_update_payload(payload: &Value) -> Result<TaskPatch> {
    let body = as_object(payload)?;

    if !UPDATABLE_FIELDS.iter().any(|field| body.contains_key(*field)) {
        return Err(ValidationError::field(
            "No fields to update",
            "body",
            "You must provide at least one field to update",
        ));
    }

    let title = optional_string(body, "title", "Title")?;
    let description = optional_string(body, "description", "Description")?;
    let status = optional_string(body, "status", "Status")?;

    if let Some(title) = title {
        validate_title(title)?;
    }
    validate_description(description)?;
    let status = validate_status(status)?;

    Ok(TaskPatch {
        title: title.map(str::to_string),
        description: description.map(str::to_string),
        status,
    })
}

pub fn validate_credentials(payload: &Value) -> Result<Credentials> {
    let body = as_object(payload)?;

    for (field, label) in [("username", "Username"), ("password", "Password")] {
        if !body.contains_key(field) {
            return Err(ValidationError::field(
                "Missing required fields",
                field,
                format!("{} is required", label),
            ));
        }
    }

    let username = optional_string(body, "username", "Username")?.unwrap_or_default();
    let password = optional_string(body, "password", "Password")?.unwrap_or_default();

    if username.chars().count() < USERNAME_MIN_CHARS {
        return Err(ValidationError::field(
            "Invalid username",
            "username",
            format!(
                "Username must have at least {} characters",
                USERNAME_MIN_CHARS
            ),
        ));
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationError::field(
            "Invalid password",
            "password",
            format!(
                "Password must have at least {} characters",
                PASSWORD_MIN_CHARS
            ),
        ));
    }

    Ok(Credentials::new(username, password))
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload.as_object().ok_or_else(|| {
        ValidationError::field(
            "Invalid request body",
            "body",
            "Request body must be a JSON object",
        )
    })
}

/// Absent -> `None`; present but not a string (including `null`) -> error.
fn optional_string<'a>(
    body: &'a Map<String, Value>,
    field: &str,
    label: &str,
) -> Result<Option<&'a str>> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::field(
            "Invalid data type",
            field,
            format!("{} must be a string", label),
        )),
    }
}
