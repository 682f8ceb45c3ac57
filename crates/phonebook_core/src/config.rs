//! Client configuration loaded from environment variables.
//!
//! # Invariants
//! - `api_base_url` is an absolute `http`/`https` URL.
//! - `request_timeout` is strictly positive.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const ENV_API_URL: &str = "PHONEBOOK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PHONEBOOK_TIMEOUT_SECS";
pub const ENV_SESSION_DB: &str = "PHONEBOOK_SESSION_DB";
pub const ENV_LOG_LEVEL: &str = "PHONEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PHONEBOOK_LOG_DIR";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_DB_FILE: &str = "phonebook_session.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { key, value, reason } => {
                write!(f, "invalid {key} value `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub session_db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unset or blank keys fall back to defaults: `http://localhost:3000`, a
    /// 10 second timeout, `phonebook_session.sqlite3`, and no file logging.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let api_url = get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self {
            api_base_url: parse_base_url(&api_url)?,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_db_path: PathBuf::from(DEFAULT_SESSION_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        };

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw.parse::<u64>().map_err(|err| invalid(ENV_TIMEOUT_SECS, &raw, err))?;
            if secs == 0 {
                return Err(invalid(ENV_TIMEOUT_SECS, &raw, "must be greater than zero"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get(ENV_SESSION_DB) {
            config.session_db_path = PathBuf::from(raw);
        }

        if let Some(raw) = get(ENV_LOG_LEVEL) {
            let level = normalize_level(&raw).map_err(|err| invalid(ENV_LOG_LEVEL, &raw, err))?;
            config.log_level = level.to_string();
        }

        if let Some(raw) = get(ENV_LOG_DIR) {
            let path = PathBuf::from(&raw);
            if !path.is_absolute() {
                return Err(invalid(ENV_LOG_DIR, &raw, "must be an absolute path"));
            }
            config.log_dir = Some(path);
        }

        info!(
            "event=config_load module=config status=ok api_base_url={} timeout_secs={} file_logging={}",
            config.api_base_url,
            config.request_timeout.as_secs(),
            config.log_dir.is_some()
        );
        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|err| invalid(ENV_API_URL, raw, err))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(ENV_API_URL, raw, "scheme must be http or https"));
    }
    Ok(url)
}

fn invalid(key: &'static str, value: &str, reason: impl Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
