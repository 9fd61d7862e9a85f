//! Server configuration from the environment

use std::time::Duration;
use thiserror::Error;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("LOG_FORMAT must be \"pretty\" or \"json\", got {0:?}")]
    InvalidLogFormat(String),

    #[error("HTTP_ADDR must not be empty")]
    EmptyAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind, always `host:port`
    pub http_addr: String,
    /// Grace period for in-flight requests once shutdown starts
    pub shutdown_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source; unset or blank variables
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(addr) = get("HTTP_ADDR") {
            config.http_addr = normalize_addr(&addr)?;
        }

        if let Some(secs) = get("SHUTDOWN_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout {
                name: "SHUTDOWN_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.shutdown_timeout = Duration::from_secs(secs);
        }

        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = match format.to_ascii_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::InvalidLogFormat(format)),
            };
        }

        Ok(config)
    }
}

/// `8080` and `:8080` listen on all interfaces
fn normalize_addr(addr: &str) -> Result<String, ConfigError> {
    if addr == ":" {
        return Err(ConfigError::EmptyAddr);
    }
    if let Some(port) = addr.strip_prefix(':') {
        return Ok(format!("0.0.0.0:{}", port));
    }
    if addr.chars().all(|c| c.is_ascii_digit()) {
        return Ok(format!("0.0.0.0:{}", addr));
    }
    Ok(addr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_addr_forms() {
        assert_eq!(config_from(&[("HTTP_ADDR", "9090")]).unwrap().http_addr, "0.0.0.0:9090");
        assert_eq!(config_from(&[("HTTP_ADDR", ":9090")]).unwrap().http_addr, "0.0.0.0:9090");
        assert_eq!(
            config_from(&[("HTTP_ADDR", "127.0.0.1:3000")]).unwrap().http_addr,
            "127.0.0.1:3000"
        );
        assert_eq!(
            config_from(&[("HTTP_ADDR", ":")]).unwrap_err(),
            ConfigError::EmptyAddr
        );
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("HTTP_ADDR", "  "), ("LOG_FORMAT", "")]).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_timeout_and_log_format() {
        let config =
            config_from(&[("SHUTDOWN_TIMEOUT_SECS", "3"), ("LOG_FORMAT", "JSON")]).unwrap();
        assert_eq!(config.shutdown_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);

        assert!(matches!(
            config_from(&[("SHUTDOWN_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert_eq!(
            config_from(&[("LOG_FORMAT", "xml")]).unwrap_err(),
            ConfigError::InvalidLogFormat("xml".to_string())
        );
    }
}
