use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::infra::{cache::default_cache_path, wiki::DEFAULT_BASE_URL};
use crate::util::{logging::default_log_dir, version::default_user_agent};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub cache_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        let api_base_url = lookup("OATHPLATE_API_BASE").unwrap_or(defaults.api_base_url);
        if url::Url::parse(&api_base_url).is_err() {
            return Err(format!("Invalid OATHPLATE_API_BASE: {api_base_url}"));
        }

        let user_agent = lookup("OATHPLATE_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        let request_timeout_secs = match lookup("OATHPLATE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("Invalid OATHPLATE_REQUEST_TIMEOUT_SECS: {raw}"))?,
            None => defaults.request_timeout_secs,
        };
        if request_timeout_secs == 0 {
            return Err("OATHPLATE_REQUEST_TIMEOUT_SECS must be greater than 0".to_string());
        }

        let cache_path = lookup("OATHPLATE_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_path);

        let log_dir = lookup("OATHPLATE_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        let log_level = lookup("LOG_LEVEL")
            .unwrap_or(defaults.log_level)
            .to_lowercase();
        if !VALID_LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, VALID_LOG_LEVELS
            ));
        }

        Ok(Self {
            api_base_url,
            user_agent,
            request_timeout_secs,
            cache_path,
            log_dir,
            log_level,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            request_timeout_secs: 10,
            cache_path: default_cache_path(),
            log_dir: default_log_dir(),
            log_level: "info".to_string(),
        }
    }
}
