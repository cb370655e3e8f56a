//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PUNGUIN_API_KEY` - Auth provider API key
//! - `PUNGUIN_DATABASE_URL` - Realtime store base URL
//!
//! ## Optional
//! - `PUNGUIN_AUTH_URL` - Auth endpoint (default:
//!   `https://identitytoolkit.googleapis.com/v1`)
//! - `PUNGUIN_GALLERY_DIR` - Local image gallery directory (default: `gallery`)
//! - `PUNGUIN_LOG_FILE` - Log file path (default: `punguin.log`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_GALLERY_DIR: &str = "gallery";
const DEFAULT_LOG_FILE: &str = "punguin.log";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClientConfig {
    /// Auth provider API key (sent as a query parameter).
    pub api_key: SecretString,
    /// Realtime store base URL (per-owner collections live under
    /// `products/{ownerId}`).
    pub database_url: Url,
    /// Auth provider endpoint.
    pub auth_url: String,
    /// Directory the image gallery reads from.
    pub gallery_dir: PathBuf,
    /// File the tracing subscriber writes to (the terminal belongs to
    /// the UI).
    pub log_file: PathBuf,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("database_url", &self.database_url.as_str())
            .field("auth_url", &self.auth_url)
            .field("gallery_dir", &self.gallery_dir)
            .field("log_file", &self.log_file)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = SecretString::from(get_required_env("PUNGUIN_API_KEY")?);

        let raw_db_url = get_required_env("PUNGUIN_DATABASE_URL")?;
        let database_url = Url::parse(&raw_db_url).map_err(|e| {
            ConfigError::InvalidEnvVar("PUNGUIN_DATABASE_URL".to_owned(), e.to_string())
        })?;

        let auth_url = get_env_or_default("PUNGUIN_AUTH_URL", DEFAULT_AUTH_URL);
        let gallery_dir = PathBuf::from(get_env_or_default(
            "PUNGUIN_GALLERY_DIR",
            DEFAULT_GALLERY_DIR,
        ));
        let log_file = PathBuf::from(get_env_or_default("PUNGUIN_LOG_FILE", DEFAULT_LOG_FILE));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_key,
            database_url,
            auth_url,
            gallery_dir,
            log_file,
            sentry_dsn,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            api_key: SecretString::from("k3y-v4lu3".to_owned()),
            database_url: Url::parse("https://punguin-default-rtdb.example.app/").unwrap(),
            auth_url: DEFAULT_AUTH_URL.to_owned(),
            gallery_dir: PathBuf::from("gallery"),
            log_file: PathBuf::from("punguin.log"),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("k3y-v4lu3"));
        assert!(debug_output.contains("punguin-default-rtdb.example.app"));
    }

    #[test]
    fn test_invalid_database_url_rejected() {
        let err = Url::parse("not a url").unwrap_err();
        // Mirror of the from_env mapping; Url::parse failures become
        // InvalidEnvVar.
        let config_err =
            ConfigError::InvalidEnvVar("PUNGUIN_DATABASE_URL".to_owned(), err.to_string());
        assert!(
            config_err
                .to_string()
                .contains("Invalid environment variable PUNGUIN_DATABASE_URL")
        );
    }
}
