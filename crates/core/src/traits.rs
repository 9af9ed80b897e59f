//! The delegation boundary to the wrapped object-storage client.
//!
//! `ObjectStore` is the only surface the facade talks to. Keeping it
//! SDK-independent lets the facade be tested against a mock and leaves the
//! door open for backends other than the AWS SDK.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use jiff::Timestamp;
use serde::Serialize;

use crate::error::Result;

/// A listed object or inferred directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectInfo {
    /// Full key inside the bucket; directory keys end with `/`.
    pub key: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub user_metadata: HashMap<String, String>,
}

impl ObjectInfo {
    pub fn file(key: impl Into<String>, size_bytes: i64) -> Self {
        Self {
            key: key.into(),
            is_dir: false,
            size_bytes: Some(size_bytes),
            ..Default::default()
        }
    }

    pub fn dir(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_dir: true,
            ..Default::default()
        }
    }

    /// Human-readable size, e.g. `1.5 KiB`.
    pub fn size_human(&self) -> Option<String> {
        self.size_bytes
            .map(|s| humansize::format_size(s.max(0) as u64, humansize::BINARY))
    }
}

/// A bucket as reported by the store.
#[derive(Debug, Clone, Serialize)]
pub struct BucketInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
}

/// Options for [`ObjectStore::list_objects`].
///
/// Non-recursive listings group keys below the first `/` past the prefix
/// into common prefixes; recursive listings return every key.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub prefix: Option<String>,
    pub recursive: bool,
    pub max_keys: Option<i32>,
    pub continuation_token: Option<String>,
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    pub items: Vec<ObjectInfo>,
    pub truncated: bool,
    pub continuation_token: Option<String>,
}

/// Options for uploads.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

/// Operations the facade delegates to the wrapped storage client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Fails with [`crate::Error::DirectoryNotEmpty`] when keys remain.
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult>;

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        options: PutOptions,
    ) -> Result<ObjectInfo>;

    /// Upload from local disk, streaming the file body.
    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        file: &Path,
        options: PutOptions,
    ) -> Result<ObjectInfo>;

    /// Server-side copy.
    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<ObjectInfo>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Batch delete; returns the keys the store confirmed deleted.
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<String>>;

    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String>;

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
        content_type: Option<String>,
    ) -> Result<String>;
}
