//! Document storage
//!
//! Vehicle RC documents go to an S3-compatible bucket (Supabase storage in
//! production). Uploads are path-style `PUT`s signed with AWS Signature V4.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Url;
use ring::{digest, hmac};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Secrets;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::sanitize_file_name;

/// Where uploaded documents are kept
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `bytes` under `key`
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()>;

    /// Public URL of a stored key
    fn public_url(&self, key: &str) -> String;
}

/// Fresh object key for an RC document
pub fn rc_document_key(file_name: &str) -> String {
    format!(
        "rc_documents/{}_{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(file_name)
    )
}

/// Percent-encode each path segment, keep the slashes
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// S3 connection settings
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub public_base_url: Option<String>,
    pub timeout: Duration,
}

impl From<&Secrets> for S3Config {
    fn from(secrets: &Secrets) -> Self {
        Self {
            endpoint: secrets.storage_endpoint.clone(),
            bucket: secrets.storage_bucket.clone(),
            region: secrets.storage_region.clone(),
            access_key_id: secrets.storage_access_key.clone(),
            secret_access_key: secrets.storage_secret_key.clone(),
            public_base_url: secrets.storage_public_url.clone(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// AWS Signature V4 for the `s3` service
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    access_key_id: String,
    secret_access_key: String,
    region: String,
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest::digest(&digest::SHA256, data).as_ref())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

impl SigV4Signer {
    pub fn new(access_key_id: &str, secret_access_key: &str, region: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            region: region.to_string(),
        }
    }

    /// Hex SHA-256 of a request body, as sent in `x-amz-content-sha256`
    pub fn payload_hash(body: &[u8]) -> String {
        sha256_hex(body)
    }

    fn signing_key(&self, date_stamp: &str) -> Vec<u8> {
        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_access_key).as_bytes(),
            date_stamp.as_bytes(),
        );
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, b"s3");
        hmac_sha256(&k_service, b"aws4_request")
    }

    /// `Authorization` header value. `headers` must include `host`,
    /// `x-amz-content-sha256` and `x-amz-date`, and every `x-amz-*` header
    /// that will be sent.
    pub fn authorization(
        &self,
        method: &str,
        canonical_uri: &str,
        headers: &[(&str, String)],
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> String {
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let mut sorted: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
            .collect();
        sorted.sort();

        let canonical_headers: String = sorted
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect();
        let signed_headers = sorted
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "{}\n{}\n\n{}\n{}\n{}",
            method, canonical_uri, canonical_headers, signed_headers, payload_hash
        );

        let scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(&date_stamp),
            string_to_sign.as_bytes(),
        ));

        format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key_id, scope, signed_headers, signature
        )
    }
}

/// S3-compatible bucket
pub struct S3DocumentStore {
    config: S3Config,
    signer: SigV4Signer,
    client: reqwest::Client,
}

impl S3DocumentStore {
    pub fn new(config: S3Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Storage(format!("HTTP client error: {}", e)))?;

        // Endpoint must parse as a URL
        Url::parse(&config.endpoint)
            .map_err(|e| AppError::Storage(format!("Invalid storage endpoint: {}", e)))?;

        let signer = SigV4Signer::new(
            &config.access_key_id,
            &config.secret_access_key,
            &config.region,
        );

        info!("🪣 Document storage ready (bucket: {})", config.bucket);

        Ok(Self {
            config,
            signer,
            client,
        })
    }

    /// Path-style object URL
    pub fn object_url(&self, key: &str) -> AppResult<Url> {
        let raw = format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            encode_key(key)
        );
        Url::parse(&raw).map_err(|e| AppError::Storage(format!("Invalid object URL: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        let url = self.object_url(key)?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(AppError::Storage("Storage endpoint has no host".to_string())),
        };

        let now = Utc::now();
        let payload_hash = SigV4Signer::payload_hash(&bytes);
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let signed = [
            ("host", host),
            ("x-amz-acl", "public-read".to_string()),
            ("x-amz-content-sha256", payload_hash.clone()),
            ("x-amz-date", amz_date.clone()),
        ];
        let authorization = self
            .signer
            .authorization("PUT", url.path(), &signed, &payload_hash, now);

        let size = bytes.len();
        let response = self
            .client
            .put(url)
            .header("Authorization", authorization)
            .header("Content-Type", content_type)
            .header("Cache-Control", "max-age=86400")
            .header("x-amz-acl", "public-read")
            .header("x-amz-content-sha256", payload_hash)
            .header("x-amz-date", amz_date)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("PUT {} failed: {}", key, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "PUT {} failed: {} - {}",
                key, status, body
            )));
        }

        debug!("📤 Uploaded {} ({} bytes)", key, size);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let base = match &self.config.public_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!(
                "{}/{}",
                self.config.endpoint.trim_end_matches('/'),
                self.config.bucket
            ),
        };
        format!("{}/{}", base, encode_key(key))
    }
}

/// Stored object in the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-memory store for tests and local runs
#[derive(Default)]
pub struct MemoryDocumentStore {
    objects: RwLock<HashMap<String, StoredDocument>>,
    fail_uploads: bool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every upload
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredDocument> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        if self.fail_uploads {
            return Err(AppError::Storage(format!("upload of {} rejected", key)));
        }
        self.objects.write().await.insert(
            key.to_string(),
            StoredDocument {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://{}", encode_key(key))
    }
}
