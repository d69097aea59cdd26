//! Configuration module
//!
//! Storage and upload settings for the ingestion pipeline, read from the
//! environment (with `.env` support).

use std::env;

use crate::storage_types::StorageBackend;

const MAX_FILE_SIZE_MB: usize = 10;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/media";
const DEFAULT_LOCAL_STORAGE_BASE_URL: &str = "http://localhost:4000/media";
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp";
const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    // Upload validation
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions = split_list(
            &lookup("ALLOWED_EXTENSIONS").unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
        );

        let allowed_content_types = split_list(
            &lookup("ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|| DEFAULT_ALLOWED_CONTENT_TYPES.to_string()),
        );

        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", max_file_size_mb))?;

        Ok(Config {
            environment,
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LOCAL_STORAGE_BASE_URL.to_string()),
            max_file_size_bytes,
            allowed_extensions,
            allowed_content_types,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must not be empty when using local storage backend"
                    ));
                }
            }
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }

        Ok(())
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> &str {
        &self.local_storage_path
    }

    pub fn local_storage_base_url(&self) -> &str {
        &self.local_storage_base_url
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
