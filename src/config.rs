//! Configuration file parser for ~/.config/dailywords/config.toml.
//!
//! The config file is optional, a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tasks::{Quotas, PHRASE_QUOTA, WORD_QUOTA};

/// Environment variable that overrides `admin_token` from the file
pub const ADMIN_TOKEN_ENV: &str = "DAILYWORDS_ADMIN_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level service configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// The custom Debug impl masks `admin_token`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub bind_address: String,

    /// SQLite database file. `None` places it in the config directory.
    pub database_path: Option<PathBuf>,

    /// Shared secret required in `X-Admin-Token` for add/delete requests.
    /// `None` leaves those routes open.
    pub admin_token: Option<String>,

    /// Maximum words in a daily set.
    pub word_quota: usize,

    /// Maximum phrases in a daily set.
    pub phrase_quota: usize,

    /// Insert the starter dictionary when the database is empty.
    pub seed_on_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            database_path: None,
            admin_token: None,
            word_quota: WORD_QUOTA,
            phrase_quota: PHRASE_QUOTA,
            seed_on_empty: true,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_path", &self.database_path)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("word_quota", &self.word_quota)
            .field("phrase_quota", &self.phrase_quota)
            .field("seed_on_empty", &self.seed_on_empty)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "bind_address",
                "database_path",
                "admin_token",
                "word_quota",
                "phrase_quota",
                "seed_on_empty",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            bind_address = %config.bind_address,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Daily quotas as configured
    pub fn quotas(&self) -> Quotas {
        Quotas {
            words: self.word_quota,
            phrases: self.phrase_quota,
        }
    }

    /// The admin secret, with `DAILYWORDS_ADMIN_TOKEN` taking precedence
    /// over the file. Empty values count as unset.
    pub fn admin_token(&self) -> Option<SecretString> {
        Self::pick_admin_token(std::env::var(ADMIN_TOKEN_ENV).ok(), self.admin_token.clone())
    }

    fn pick_admin_token(env: Option<String>, file: Option<String>) -> Option<SecretString> {
        env.filter(|token| !token.trim().is_empty())
            .or_else(|| file.filter(|token| !token.trim().is_empty()))
            .map(SecretString::from)
    }
}

// ============================================================================
// Tests
// ============================================================================
