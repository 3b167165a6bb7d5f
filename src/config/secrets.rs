//! Secrets file
//!
//! Credentials live in a JSON file next to the server (database access and
//! the object-storage keys). A missing or malformed file is fatal.

use serde::Deserialize;
use std::path::Path;

use super::ConfigError;

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

/// Contents of `secrets.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    #[serde(rename = "DATABASE_URL", default)]
    pub database_url: Option<String>,
    #[serde(rename = "DB_NAME", default)]
    pub db_name: Option<String>,
    #[serde(rename = "DB_USER", default)]
    pub db_user: Option<String>,
    #[serde(rename = "DB_PASSWORD", default)]
    pub db_password: Option<String>,
    #[serde(rename = "DB_HOST", default)]
    pub db_host: Option<String>,
    #[serde(rename = "DB_PORT", default)]
    pub db_port: Option<PortValue>,

    #[serde(rename = "SUPABASE_ACCESS_KEY_ID")]
    pub storage_access_key: String,
    #[serde(rename = "SUPABASE_SECRET_ACCESS_KEY")]
    pub storage_secret_key: String,
    #[serde(rename = "SUPABASE_BUCKET_NAME")]
    pub storage_bucket: String,
    #[serde(rename = "SUPABASE_ENDPOINT_URL")]
    pub storage_endpoint: String,
    #[serde(rename = "SUPABASE_REGION", default = "default_region")]
    pub storage_region: String,
    #[serde(rename = "SUPABASE_PUBLIC_URL", default)]
    pub storage_public_url: Option<String>,

    #[serde(rename = "CORS_ALLOWED_ORIGINS", default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// `DB_PORT` shows up both as a number and as a string in the wild
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PortValue {
    Number(u16),
    Text(String),
}

impl PortValue {
    fn as_text(&self) -> String {
        match self {
            PortValue::Number(n) => n.to_string(),
            PortValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl Secrets {
    /// Load and parse the secrets file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SecretsNotFound {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw).map_err(|e| match e {
            ConfigError::SecretsMalformed { message, .. } => ConfigError::SecretsMalformed {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse secrets from a JSON string
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let secrets: Secrets =
            serde_json::from_str(raw).map_err(|e| ConfigError::SecretsMalformed {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        // A usable database URL is required
        secrets.database_url()?;
        Ok(secrets)
    }

    /// Connection URL: `DATABASE_URL` wins, otherwise built from the `DB_*` parts
    pub fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = self.database_url.as_ref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.trim().to_string());
        }

        let name = self
            .db_name
            .as_ref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(ConfigError::MissingSecret("DATABASE_URL or DB_NAME"))?;
        let host = self
            .db_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or("localhost");
        let port = self
            .db_port
            .as_ref()
            .map(PortValue::as_text)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "5432".to_string());

        let credentials = match (&self.db_user, &self.db_password) {
            (Some(user), Some(password)) => format!(
                "{}:{}@",
                urlencoding::encode(user),
                urlencoding::encode(password)
            ),
            (Some(user), None) => format!("{}@", urlencoding::encode(user)),
            _ => String::new(),
        };

        Ok(format!(
            "postgres://{}{}:{}/{}",
            credentials,
            host,
            port,
            name.trim()
        ))
    }
}
