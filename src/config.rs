//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

pub const ENV_BASE_URL: &str = "EDUSPHERE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "EDUSPHERE_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "EDUSPHERE_CONNECT_TIMEOUT_SECS";
pub const ENV_STATE_FILE: &str = "EDUSPHERE_STATE_FILE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the API prefix, without trailing slash.
    pub base_url: String,
    /// Ceiling for a whole call; expiry counts as a transport failure.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Where the CLI keeps its durable session entries.
    pub state_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            state_file: default_state_file(),
        }
    }
}

impl ClientConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `EDUSPHERE_BASE_URL`: default `http://127.0.0.1:8080/api`
    /// - `EDUSPHERE_TIMEOUT_SECS`: default 10
    /// - `EDUSPHERE_CONNECT_TIMEOUT_SECS`: default 5
    /// - `EDUSPHERE_STATE_FILE`: default `<config dir>/edusphere/session.json`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup(ENV_BASE_URL) {
            Some(raw) => normalize_base_url(ENV_BASE_URL, &raw)?,
            None => DEFAULT_BASE_URL.to_owned(),
        };
        let timeout = parse_secs(ENV_TIMEOUT_SECS, lookup(ENV_TIMEOUT_SECS), DEFAULT_TIMEOUT_SECS)?;
        let connect_timeout =
            parse_secs(ENV_CONNECT_TIMEOUT_SECS, lookup(ENV_CONNECT_TIMEOUT_SECS), DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let state_file = match lookup(ENV_STATE_FILE) {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::Empty { var: ENV_STATE_FILE }),
            Some(raw) => PathBuf::from(raw.trim()),
            None => default_state_file(),
        };
        Ok(Self { base_url, timeout, connect_timeout, state_file })
    }
}

pub(crate) fn normalize_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(trimmed.to_owned())
}

fn parse_secs(var: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds { var, value: raw }),
    }
}

fn default_state_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("edusphere")
        .join("session.json")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
