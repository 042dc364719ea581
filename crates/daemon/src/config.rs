//! Server configuration
//!
//! Layered: built-in defaults, then an optional TOML file
//! (`taskdesk.toml`, or the path in `TASKDESK_CONFIG`), then `TASKDESK_*`
//! environment variables with `__` between sections, e.g.
//! `TASKDESK_SERVER__PORT=9000`.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use taskdesk_infra_auth::TokenAlgorithm;

pub const DEFAULT_CONFIG_FILE: &str = "taskdesk.toml";
pub const CONFIG_PATH_ENV: &str = "TASKDESK_CONFIG";
pub const DEFAULT_SECRET: &str = "change-me-in-production";

const ENV_PREFIX: &str = "TASKDESK";

/// One year
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub cors: CorsSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    pub url: String,
}

#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    pub secret: String,
    pub algorithm: String,
    pub token_ttl_minutes: i64,
    pub demo_username: String,
    pub demo_password: String,
}

// Keep secrets out of `{:?}` log lines
impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("demo_username", &self.demo_username)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path, None)
    }

    /// Load with an explicit file path; `env` replaces the process
    /// environment when given
    pub fn load_from(path: &str, env: Option<HashMap<String, String>>) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.backend", "sqlite")?
            .set_default("database.url", "sqlite://taskdesk.db")?
            .set_default("auth.secret", DEFAULT_SECRET)?
            .set_default("auth.algorithm", "HS256")?
            .set_default("auth.token_ttl_minutes", 30)?
            .set_default("auth.demo_username", "admin")?
            .set_default("auth.demo_password", "password")?
            .set_default("cors.allowed_origins", vec!["*".to_string()])?
            .set_default("log.format", "pretty")?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .source(env),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.database.backend == StorageBackend::Sqlite && self.database.url.trim().is_empty() {
            bail!("database.url is required for the sqlite backend");
        }
        if self.auth.secret.is_empty() {
            bail!("auth.secret must not be empty");
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.auth.token_ttl_minutes) {
            bail!(
                "auth.token_ttl_minutes must be between 1 and {}",
                MAX_TOKEN_TTL_MINUTES
            );
        }
        self.token_algorithm()?;
        if !self.auth.demo_username.is_empty() && self.auth.demo_password.is_empty() {
            bail!("auth.demo_password is required when auth.demo_username is set");
        }
        Ok(())
    }

    pub fn token_algorithm(&self) -> Result<TokenAlgorithm> {
        self.auth
            .algorithm
            .parse()
            .map_err(|e: String| anyhow::anyhow!("auth.algorithm: {}", e))
    }

    pub fn uses_default_secret(&self) -> bool {
        self.auth.secret == DEFAULT_SECRET
    }
}
