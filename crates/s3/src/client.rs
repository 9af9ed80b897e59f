//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from ofs-core.
//! Data-path calls are wrapped in the core retry so transient endpoint
//! hiccups don't surface to the facade.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use jiff::Timestamp;

use ofs_core::retry::retry_with_backoff;
use ofs_core::{
    BucketInfo, Connection, Error, ListOptions, ListResult, ObjectInfo, ObjectStore, PutOptions,
    Result, RetryConfig,
};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    retry: RetryConfig,
}

impl S3Client {
    /// Create a new client from a connection description.
    pub async fn new(conn: Connection) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            conn.access_key.clone(),
            conn.secret_key.clone(),
            None, // session token
            None, // expiry
            "ofs-static-credentials",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(conn.region.clone()))
            .endpoint_url(&conn.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(conn.path_style)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            retry: conn.retry,
        })
    }

    /// The underlying aws-sdk-s3 client.
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    async fn with_retry<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        retry_with_backoff(&self.retry, operation).await
    }
}

/// SDK timestamps carry sub-second precision; keep it so recency ordering
/// of close writes stays stable.
fn timestamp_from(dt: &aws_sdk_s3::primitives::DateTime) -> Option<Timestamp> {
    Timestamp::from_millisecond(dt.to_millis().ok()?).ok()
}

/// Classify an SDK failure into the core taxonomy. Service errors carry an
/// error code in the response body; transport failures don't get that far.
fn map_sdk_error<E, R>(err: SdkError<E, R>, what: &str) -> Error
where
    E: ProvideErrorMetadata + std::fmt::Debug,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::TimeoutError(_) => Error::Network(format!("{what}: request timeout")),
        SdkError::DispatchFailure(e) => Error::Network(format!("{what}: dispatch failure: {e:?}")),
        SdkError::ResponseError(e) => Error::Network(format!("{what}: response error: {e:?}")),
        _ => match err.code() {
            Some("NoSuchKey") | Some("NoSuchBucket") | Some("NotFound") => {
                Error::NotFound(what.to_string())
            }
            Some("BucketNotEmpty") => Error::DirectoryNotEmpty(what.to_string()),
            Some("AccessDenied") | Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") => {
                Error::Auth(format!(
                    "{what}: {}",
                    err.message().unwrap_or("access denied")
                ))
            }
            Some(code) => {
                Error::General(format!("{what}: {code}: {}", err.message().unwrap_or("")))
            }
            None => Error::Network(format!("{what}: {err:?}")),
        },
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let response = self
            .with_retry(|| async {
                self.inner
                    .list_buckets()
                    .send()
                    .await
                    .map_err(|e| map_sdk_error(e, "list buckets"))
            })
            .await?;

        Ok(response
            .buckets()
            .iter()
            .map(|b| BucketInfo {
                name: b.name().unwrap_or_default().to_string(),
                created: b.creation_date().and_then(timestamp_from),
            })
            .collect())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        self.with_retry(|| async {
            match self.inner.head_bucket().bucket(bucket).send().await {
                Ok(_) => Ok(true),
                Err(e) => {
                    if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                        Ok(false)
                    } else {
                        Err(map_sdk_error(e, bucket))
                    }
                }
            }
        })
        .await
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.with_retry(|| async {
            self.inner
                .create_bucket()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, bucket))
        })
        .await?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.with_retry(|| async {
            self.inner
                .delete_bucket()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, bucket))
        })
        .await?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let response = self
            .with_retry(|| async {
                let mut request = self.inner.list_objects_v2().bucket(bucket);
                if let Some(prefix) = &options.prefix
                    && !prefix.is_empty()
                {
                    request = request.prefix(prefix);
                }
                if !options.recursive {
                    request = request.delimiter("/");
                }
                if let Some(max) = options.max_keys {
                    request = request.max_keys(max);
                }
                if let Some(token) = &options.continuation_token {
                    request = request.continuation_token(token);
                }
                request.send().await.map_err(|e| map_sdk_error(e, bucket))
            })
            .await?;

        let mut items = Vec::new();

        // common prefixes are the inferred directories
        for prefix in response.common_prefixes() {
            if let Some(p) = prefix.prefix() {
                items.push(ObjectInfo::dir(p));
            }
        }

        for object in response.contents() {
            let key = object.key().unwrap_or_default().to_string();
            let mut info = ObjectInfo::file(key, object.size().unwrap_or(0));
            if let Some(modified) = object.last_modified() {
                info.last_modified = timestamp_from(modified);
            }
            if let Some(etag) = object.e_tag() {
                info.etag = Some(etag.trim_matches('"').to_string());
            }
            items.push(info);
        }

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectInfo> {
        let response = self
            .with_retry(|| async {
                self.inner
                    .head_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .map_err(|e| {
                        if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                            Error::NotFound(format!("{bucket}/{key}"))
                        } else {
                            map_sdk_error(e, &format!("{bucket}/{key}"))
                        }
                    })
            })
            .await?;

        let mut info = ObjectInfo::file(key, response.content_length().unwrap_or(0));
        if let Some(modified) = response.last_modified() {
            info.last_modified = timestamp_from(modified);
        }
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        if let Some(ct) = response.content_type() {
            info.content_type = Some(ct.to_string());
        }
        if let Some(metadata) = response.metadata() {
            info.user_metadata = metadata.clone();
        }
        Ok(info)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.with_retry(|| async {
            let response = self
                .inner
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                        Error::NotFound(format!("{bucket}/{key}"))
                    } else {
                        map_sdk_error(e, &format!("{bucket}/{key}"))
                    }
                })?;
            let data = response
                .body
                .collect()
                .await
                .map_err(|e| Error::Network(format!("{bucket}/{key}: reading body: {e}")))?;
            Ok(data.into_bytes())
        })
        .await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        options: PutOptions,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;
        let body = Bytes::from(data);

        let response = self
            .with_retry(|| async {
                let mut request = self
                    .inner
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .body(ByteStream::from(body.clone()));
                if let Some(ct) = &options.content_type {
                    request = request.content_type(ct);
                }
                if !options.metadata.is_empty() {
                    request = request.set_metadata(Some(options.metadata.clone()));
                }
                request
                    .send()
                    .await
                    .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))
            })
            .await?;

        let mut info = ObjectInfo::file(key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.last_modified = Some(Timestamp::now());
        Ok(info)
    }

    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        file: &Path,
        options: PutOptions,
    ) -> Result<ObjectInfo> {
        let size = tokio::fs::metadata(file).await?.len() as i64;

        let response = self
            .with_retry(|| async {
                let body = ByteStream::from_path(file).await.map_err(|e| {
                    Error::Io(std::io::Error::other(format!("{}: {e}", file.display())))
                })?;
                let mut request = self
                    .inner
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .body(body);
                if let Some(ct) = &options.content_type {
                    request = request.content_type(ct);
                }
                if !options.metadata.is_empty() {
                    request = request.set_metadata(Some(options.metadata.clone()));
                }
                request
                    .send()
                    .await
                    .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))
            })
            .await?;

        let mut info = ObjectInfo::file(key, size);
        if let Some(etag) = response.e_tag() {
            info.etag = Some(etag.trim_matches('"').to_string());
        }
        info.last_modified = Some(Timestamp::now());
        Ok(info)
    }

    async fn copy_object(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<ObjectInfo> {
        let copy_source = format!("{src_bucket}/{src_key}");

        self.with_retry(|| async {
            self.inner
                .copy_object()
                .copy_source(&copy_source)
                .bucket(dst_bucket)
                .key(dst_key)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, &copy_source))
        })
        .await?;

        // the copy response carries no size; stat the destination
        self.head_object(dst_bucket, dst_key).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.with_retry(|| async {
            self.inner
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))
        })
        .await?;
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<String>> {
        use aws_sdk_s3::types::{Delete, ObjectIdentifier};

        if keys.is_empty() {
            return Ok(vec![]);
        }

        let objects = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::General(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .with_retry(|| async {
                self.inner
                    .delete_objects()
                    .bucket(bucket)
                    .delete(delete.clone())
                    .send()
                    .await
                    .map_err(|e| map_sdk_error(e, bucket))
            })
            .await?;

        let deleted: Vec<String> = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect();

        if !response.errors().is_empty() {
            let failed: Vec<&str> = response.errors().iter().filter_map(|e| e.key()).collect();
            tracing::warn!(bucket, failed = ?failed, "some keys failed to delete");
        }

        Ok(deleted)
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        let config = aws_sdk_s3::presigning::PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| Error::General(format!("presign config: {e}")))?;

        let request = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))?;

        Ok(request.uri().to_string())
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
        content_type: Option<String>,
    ) -> Result<String> {
        let config = aws_sdk_s3::presigning::PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| Error::General(format!("presign config: {e}")))?;

        let mut builder = self.inner.put_object().bucket(bucket).key(key);
        if let Some(ct) = content_type {
            builder = builder.content_type(ct);
        }

        let request = builder
            .presigned(config)
            .await
            .map_err(|e| map_sdk_error(e, &format!("{bucket}/{key}")))?;

        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_builds_from_connection() {
        let conn = Connection::new("http://localhost:9000", "minioadmin", "minioadmin").unwrap();
        let client = S3Client::new(conn).await.unwrap();
        // static credentials and endpoint are wired without touching the network
        assert!(client.inner().config().endpoint_url().is_some());
    }
}
