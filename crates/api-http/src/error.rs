//! HTTP Error Mapping
//!
//! Maps application errors to status codes and the JSON error envelope.

use crate::types::{ErrorBody, ErrorEnvelope};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskdesk_core::error::{AppError, ErrorClass};
use taskdesk_core::domain::ValidationError;
use tracing::{error, warn};

/// Any failure a handler can return
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(AppError::Validation(err))
    }
}

pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorClass::Forbidden => StatusCode::FORBIDDEN,
        ErrorClass::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let class = err.classification();

        match class {
            // Client never sees this detail
            ErrorClass::Internal => error!(error = %err, kind = err.kind(), "Request failed"),
            ErrorClass::Unauthorized | ErrorClass::Forbidden => {
                warn!(kind = err.kind(), "Request rejected")
            }
            _ => {}
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                message: err.public_message(),
                kind: err.kind().to_string(),
                details: err.details().cloned(),
            },
        };

        let mut response = (status_for(class), Json(body)).into_response();
        if class == ErrorClass::Unauthorized {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

fn route_error(status: StatusCode, message: &str, kind: &str) -> Response {
    let body = ErrorEnvelope {
        error: ErrorBody {
            message: message.to_string(),
            kind: kind.to_string(),
            details: None,
        },
    };
    (status, Json(body)).into_response()
}

/// Fallback for unmatched routes
pub async fn not_found() -> Response {
    route_error(StatusCode::NOT_FOUND, "Not Found", "NotFound")
}

/// Fallback for matched paths with an unsupported method
pub async fn method_not_allowed() -> Response {
    route_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method Not Allowed",
        "MethodNotAllowed",
    )
}
