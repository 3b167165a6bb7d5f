//! Environment configuration
//!
//! Process-level settings read from the environment (after `.env` has been
//! loaded). Everything here has a default; only malformed values fail.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;

/// Environment configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub secrets_file: PathBuf,
    pub log_level: tracing::Level,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            secrets_file: PathBuf::from("credentials/secrets.json"),
            log_level: tracing::Level::INFO,
            request_timeout: Duration::from_secs(30),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl EnvironmentConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = match lookup("LOG_LEVEL") {
            Some(raw) => raw
                .trim()
                .parse::<tracing::Level>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "LOG_LEVEL".to_string(),
                    value: raw,
                })?,
            None => defaults.log_level,
        };

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            secrets_file: lookup("SECRETS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.secrets_file),
            log_level,
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    /// Check whether we run in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Address the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "9090"),
            ("LOG_LEVEL", "debug"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("SECRETS_FILE", "/etc/billing/secrets.json"),
        ]))
        .unwrap();

        assert!(!config.is_development());
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.secrets_file, PathBuf::from("/etc/billing/secrets.json"));
    }

    #[test]
    fn test_invalid_port() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
