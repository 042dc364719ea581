// Credential Store Port (Interface)

use crate::domain::Credentials;
use crate::error::Result;
use async_trait::async_trait;

/// Username -> password store backing the auth service.
///
/// Implementations must tolerate concurrent `put`/`verify` calls.
/// Registration is last-write-wins.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store (or overwrite) the credential for `credentials.username`
    async fn put(&self, credentials: &Credentials) -> Result<()>;

    /// True iff the username exists and the password matches exactly
    async fn verify(&self, credentials: &Credentials) -> Result<bool>;
}
