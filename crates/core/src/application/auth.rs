// Auth Service - credential checks and bearer token lifecycle

use crate::domain::Credentials;
use crate::error::{AppError, Result};
use crate::port::{Claims, CredentialStore, IssuedToken, TimeProvider, TokenCodec};
use std::sync::Arc;
use tracing::{info, warn};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_TOKEN: &str = "Invalid or expired token";
pub const INVALID_TOKEN_PAYLOAD: &str = "Invalid token payload";

/// Auth Service
///
/// Sole owner of the credential store and the token codec. Handlers only
/// ever see [`IssuedToken`] and [`Claims`].
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    codec: Arc<dyn TokenCodec>,
    time_provider: Arc<dyn TimeProvider>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        codec: Arc<dyn TokenCodec>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            credentials,
            codec,
            time_provider,
        }
    }

    /// Exact password match against the stored credential, then a token
    /// with `sub = username`.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<IssuedToken> {
        if !self.credentials.verify(credentials).await? {
            warn!(username = %credentials.username, "Authentication failed");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self
            .codec
            .issue(&credentials.username, self.time_provider.now())?;
        info!(username = %credentials.username, "User authenticated");
        Ok(token)
    }

    /// Store the credential (last write wins) and issue a token.
    pub async fn register(&self, credentials: &Credentials) -> Result<IssuedToken> {
        self.credentials.put(credentials).await?;
        info!(username = %credentials.username, "User registered");

        self.codec
            .issue(&credentials.username, self.time_provider.now())
    }

    /// Signature and expiry check. Every failure is an authentication error.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let claims = self
            .codec
            .decode(token, self.time_provider.now())
            .map_err(|err| match err {
                AppError::Authentication(_) => AppError::authentication(INVALID_TOKEN),
                other => other,
            })?;

        if claims.subject.is_empty() {
            return Err(AppError::authentication(INVALID_TOKEN_PAYLOAD));
        }
        Ok(claims)
    }
}
