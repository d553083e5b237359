//! Object storage interface for model files (S3/MinIO, local disk, memory).

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, path::Path, ObjectMeta,
    ObjectStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use ras_common::{RasError, RasResult};

use crate::model_store::{ListEntry, ModelStore};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            bucket: "models".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

/// Which backend to read models from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectStorageConfig {
    S3(S3Config),
    Local { root: String },
    Memory,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        ObjectStorageConfig::S3(S3Config::default())
    }
}

/// Object storage client for model files.
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl std::fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl ObjectStorage {
    /// Create a new object storage client from config.
    pub fn new(config: &ObjectStorageConfig) -> RasResult<Self> {
        match config {
            ObjectStorageConfig::S3(s3) => Self::s3(s3),
            ObjectStorageConfig::Local { root } => {
                let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
                    RasError::StorageError(format!("Failed to open {}: {}", root, e))
                })?;
                Ok(Self {
                    store: Arc::new(store),
                    bucket: root.clone(),
                })
            }
            ObjectStorageConfig::Memory => Ok(Self::in_memory()),
        }
    }

    fn s3(config: &S3Config) -> RasResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| RasError::StorageError(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
        })
    }

    /// Empty in-memory store, for tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: "memory".to_string(),
        }
    }

    /// Write bytes to a path in the bucket.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    pub async fn put(&self, path: &str, data: Bytes) -> RasResult<()> {
        let location = Path::from(path);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data)
            .await
            .map_err(|e| RasError::StorageError(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }

    /// Read bytes from a path.
    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    pub async fn get(&self, path: &str) -> RasResult<Bytes> {
        let location = Path::from(path);

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => RasError::NotFound(path.to_string()),
            e => RasError::StorageError(format!("Failed to read {}: {}", path, e)),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| RasError::StorageError(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    /// List objects with a given prefix.
    #[instrument(skip(self), fields(bucket = %self.bucket))]
    pub async fn list_entries(&self, prefix: &str, recursive: bool) -> RasResult<Vec<ListEntry>> {
        let prefix_path = Path::from(prefix);
        let prefix_arg = (!prefix.trim_matches('/').is_empty()).then_some(&prefix_path);

        let mut entries = Vec::new();
        if recursive {
            let mut stream = self.store.list(prefix_arg);
            while let Some(meta) = stream
                .try_next()
                .await
                .map_err(|e| RasError::StorageError(format!("List failed: {}", e)))?
            {
                entries.push(file_entry(&meta));
            }
        } else {
            let listing = self
                .store
                .list_with_delimiter(prefix_arg)
                .await
                .map_err(|e| RasError::StorageError(format!("List failed: {}", e)))?;

            entries.extend(listing.common_prefixes.iter().map(|dir| ListEntry {
                name: dir.filename().unwrap_or_default().to_string(),
                path: dir.to_string(),
                is_dir: true,
                size: 0,
                modified: None,
            }));
            entries.extend(listing.objects.iter().map(file_entry));
        }

        debug!(count = entries.len(), "Listed objects");
        Ok(entries)
    }
}

fn file_entry(meta: &ObjectMeta) -> ListEntry {
    ListEntry {
        name: meta.location.filename().unwrap_or_default().to_string(),
        path: meta.location.to_string(),
        is_dir: false,
        size: meta.size as u64,
        modified: Some(meta.last_modified),
    }
}

#[async_trait]
impl ModelStore for ObjectStorage {
    async fn list(&self, prefix: &str, recursive: bool) -> RasResult<Vec<ListEntry>> {
        self.list_entries(prefix, recursive).await
    }

    async fn fetch(&self, key: &str) -> RasResult<Bytes> {
        self.get(key).await
    }
}
