// Token Codec Port (Interface)

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded, verified claim set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Principal identifier (`sub`)
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Signs and verifies bearer tokens.
///
/// The codec is the only component that understands the token format.
/// `decode` fails with `AppError::Authentication` for malformed, tampered,
/// wrongly signed or expired tokens.
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `subject`, valid from `issued_at` for the configured TTL
    fn issue(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<IssuedToken>;

    /// Verify signature and expiry against `now`
    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims>;
}
