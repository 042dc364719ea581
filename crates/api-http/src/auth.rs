//! Bearer-token authentication
//!
//! `Principal` is an axum extractor. Listing it as the first handler
//! argument makes the token check run before the path or body is read.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use taskdesk_core::error::AppError;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Authenticated caller, taken from the token's `sub` claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Token part of an `Authorization: Bearer <token>` header value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::authentication(NOT_AUTHENTICATED))?;

        let claims = state.auth.verify(token)?;
        Ok(Principal {
            username: claims.subject,
        })
    }
}
