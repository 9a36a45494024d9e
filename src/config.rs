//! Runtime configuration.
//!
//! The client needs exactly one externally supplied value, the API origin.
//! Everything else has a sensible default that can be overridden from the
//! environment or the command line.

use crate::errors::ConfigError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

// ============================================================================
// Defaults
// ============================================================================

/// Environment variable holding the API origin, e.g. `https://notes.example.com`
pub const API_URL_ENV: &str = "NOTES_API_URL";

/// Environment variable overriding where the bearer token is persisted
pub const TOKEN_DB_ENV: &str = "NOTES_TOKEN_DB";

pub const DEFAULT_TOKEN_DB: &str = ".notes_client_db";

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

const NOTE_RESOURCE: &str = "api/Note";
const AUTH_RESOURCE: &str = "api/Auth";

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub token_db: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Build a config for the given origin with default storage and timeout.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            token_db: PathBuf::from(DEFAULT_TOKEN_DB),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        })
    }

    /// Resolve configuration from explicit overrides, falling back to the
    /// environment and then to defaults.
    pub fn resolve(
        api_url: Option<String>,
        token_db: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let api_url = match api_url.or_else(|| env::var(API_URL_ENV).ok()) {
            Some(u) if !u.trim().is_empty() => u,
            _ => return Err(ConfigError::MissingApiUrl),
        };

        let mut config = Self::new(&api_url)?;
        if let Some(path) = token_db.or_else(|| env::var(TOKEN_DB_ENV).ok().map(PathBuf::from)) {
            config.token_db = path;
        }
        Ok(config)
    }

    /// The API origin without a trailing slash. Also the scope key for
    /// persisted credentials.
    pub fn origin(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }

    /// Base path of the notes resource.
    pub fn notes_endpoint(&self) -> String {
        format!("{}/{}", self.origin(), NOTE_RESOURCE)
    }

    /// Base path of the sibling auth resource.
    pub fn auth_endpoint(&self) -> String {
        format!("{}/{}", self.origin(), AUTH_RESOURCE)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidApiUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
