use log::{error, trace, warn};
use thiserror::Error;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} envar is mandatory please set it")]
    Missing(&'static str),
    #[error("SERVER_PORT envar is not a valid port: {0}")]
    InvalidPort(String),
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub server_port: u16,
    pub version: String,
    pub name: String,
    pub topic: String,
    pub redis_url: String,
}

/// Logger filter, resolved before `Config::from_env` so that validation
/// messages reach the log.
pub fn log_level_from_env() -> String {
    log_level(&|key: &str| std::env::var(key).ok())
}

fn log_level<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_LEVEL")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| {
            trace!("Input parameters -> name {} : required true", key);
            get(key).ok_or_else(|| {
                error!("{} envar is mandatory please set it", key);
                ConfigError::Missing(key)
            })
        };

        if get("LOG_LEVEL").is_none() {
            warn!("LOG_LEVEL envar is empty please set it");
        }
        let log_level = log_level(&lookup);
        let port = required("SERVER_PORT")?;
        let server_port = port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;

        Ok(Self {
            log_level,
            server_port,
            version: required("VERSION")?,
            name: required("NAME")?,
            topic: required("TOPIC")?,
            redis_url: get("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
        })
    }
}
