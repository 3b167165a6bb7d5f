//! Project configuration
//!
//! Environment settings, the secrets file and database pool options.

pub mod database;
pub mod environment;
pub mod secrets;

pub use database::DatabaseConfig;
pub use environment::EnvironmentConfig;
pub use secrets::Secrets;

use thiserror::Error;

/// Startup configuration errors, all fatal
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Secrets file not found at {path}: {source}")]
    SecretsNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error decoding JSON in {path}: {message}")]
    SecretsMalformed { path: String, message: String },

    #[error("Set the {0} variable in secrets.json")]
    MissingSecret(&'static str),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: EnvironmentConfig,
    pub secrets: Secrets,
}

impl AppConfig {
    /// Read the environment, then the secrets file it points at
    pub fn load() -> Result<Self, ConfigError> {
        let environment = EnvironmentConfig::from_env()?;
        let secrets = Secrets::load(&environment.secrets_file)?;
        Ok(Self {
            environment,
            secrets,
        })
    }

    pub fn database(&self) -> Result<DatabaseConfig, ConfigError> {
        Ok(DatabaseConfig::new(self.secrets.database_url()?))
    }
}
