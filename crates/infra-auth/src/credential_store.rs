// In-memory CredentialStore Implementation

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use taskdesk_core::domain::Credentials;
use taskdesk_core::error::{AppError, Result};
use taskdesk_core::port::CredentialStore;
use tracing::debug;

/// Argon2id PHC string (`$argon2id$v=19$...`) with a fresh random salt
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

fn password_matches(stored: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AppError::Internal(format!("stored password hash is corrupt: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Process-local user table. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.users
            .lock()
            .map_err(|_| AppError::Internal("credential store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn put(&self, credentials: &Credentials) -> Result<()> {
        let hash = hash_password(&credentials.password)?;
        let replaced = self
            .lock()?
            .insert(credentials.username.clone(), hash)
            .is_some();
        debug!(username = %credentials.username, replaced, "Credential stored");
        Ok(())
    }

    async fn verify(&self, credentials: &Credentials) -> Result<bool> {
        // Clone out so the lock is not held while hashing
        let stored = self.lock()?.get(&credentials.username).cloned();
        match stored {
            Some(hash) => password_matches(&hash, &credentials.password),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_put_then_verify() {
        let store = InMemoryCredentialStore::new();
        store.put(&Credentials::new("admin", "password")).await.unwrap();

        assert!(store.verify(&Credentials::new("admin", "password")).await.unwrap());
        assert!(!store.verify(&Credentials::new("admin", "Password")).await.unwrap());
        assert!(!store.verify(&Credentials::new("nobody", "password")).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryCredentialStore::new();
        store.put(&Credentials::new("alice", "first-pass")).await.unwrap();
        store.put(&Credentials::new("alice", "second-pass")).await.unwrap();

        assert!(!store.verify(&Credentials::new("alice", "first-pass")).await.unwrap());
        assert!(store.verify(&Credentials::new("alice", "second-pass")).await.unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("password").unwrap();
        let b = hash_password("password").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("password"));
        assert_ne!(a, b);
        assert!(password_matches(&a, "password").unwrap());
        assert!(password_matches(&b, "password").unwrap());
        assert!(!password_matches(&a, "passw0rd").unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_internal() {
        assert!(matches!(
            password_matches("not-a-phc-string", "password"),
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let creds = Credentials::new(format!("user{}", i), format!("pass-{}", i));
                    store.put(&creds).await.unwrap();
                    store.verify(&creds).await.unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }
}
