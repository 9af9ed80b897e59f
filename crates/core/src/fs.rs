//! Filesystem-style verbs over an object store.
//!
//! [`ObjectFs`] maps absolute `/bucket/dir/file` paths onto bucket/key
//! operations: directories are `/`-delimited key prefixes backed by
//! zero-byte marker objects, files are real keys. Each verb is a direct
//! translation into one or a short sequence of store calls.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::Duration;

use jiff::Timestamp;

use crate::error::{Error, Result};
use crate::object::{
    DirEntry, FileEntry, FolderEntry, FsEntry, ObjectMeta, normalize_user_metadata,
};
use crate::path::{ObjectPath, ROOT};
use crate::traits::{ListOptions, ObjectInfo, ObjectStore, PutOptions};

/// Entry filter for [`ObjectFs::listdir`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    #[default]
    All,
    FilesOnly,
    DirsOnly,
}

/// Filesystem-flavored facade over an [`ObjectStore`].
///
/// Stateless apart from the store handle; every call translates the path,
/// delegates, and shapes the response.
#[derive(Debug)]
pub struct ObjectFs<S> {
    store: S,
}

impl<S> ObjectFs<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store, for operations the facade does not cover.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: ObjectStore> ObjectFs<S> {
    /// Create a directory path, `mkdir -p` style.
    ///
    /// Creates the bucket when missing. For deeper paths a zero-byte marker
    /// object is written at the directory key; the chain above it is implied
    /// by the key itself.
    pub async fn mkdirs(&self, path: &str) -> Result<()> {
        let dir = dir_path(path)?;
        if dir.is_root() {
            return Err(Error::InvalidPath("cannot create '/'".to_string()));
        }
        if !self.store.bucket_exists(dir.bucket()).await? {
            self.store.create_bucket(dir.bucket()).await?;
        }
        if dir.is_bucket() {
            return Ok(());
        }
        self.store
            .put_object(dir.bucket(), &dir.key(), Vec::new(), PutOptions::default())
            .await?;
        Ok(())
    }

    /// List a directory with per-entry metadata, most recently modified
    /// first. The root lists buckets, newest first.
    pub async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let dir = dir_path(path)?;
        if dir.is_root() {
            let mut buckets = self.store.list_buckets().await?;
            buckets.sort_by(|a, b| b.created.cmp(&a.created));
            return Ok(buckets
                .into_iter()
                .map(|b| DirEntry {
                    name: format!("{}/", b.name),
                    is_dir: true,
                    size_bytes: None,
                    last_modified: b.created,
                })
                .collect());
        }
        let key = dir.key();
        let entries = self.entries_at(&dir).await?;
        Ok(entries
            .into_iter()
            .map(|info| entry_from_info(&key, info))
            .collect())
    }

    /// Entry names in a directory, `os.listdir` style. Directory names keep
    /// their trailing `/`.
    pub async fn listdir(&self, path: &str, filter: ListFilter) -> Result<Vec<String>> {
        Ok(self
            .read_dir(path)
            .await?
            .into_iter()
            .filter(|entry| match filter {
                ListFilter::All => true,
                ListFilter::FilesOnly => !entry.is_dir,
                ListFilter::DirsOnly => entry.is_dir,
            })
            .map(|entry| entry.name)
            .collect())
    }

    /// Whether the path names something present. Malformed paths are simply
    /// absent, `os.path.exists` style.
    pub async fn exists(&self, path: &str) -> Result<bool> {
        let Ok(parsed) = ObjectPath::parse(path) else {
            return Ok(false);
        };
        if parsed.is_root() {
            return Ok(true);
        }
        if !self.store.bucket_exists(parsed.bucket()).await? {
            return Ok(false);
        }
        if parsed.is_bucket() {
            return Ok(true);
        }
        match self.get(path).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) | Err(Error::InvalidPath(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the path names an existing directory.
    pub async fn is_dir(&self, path: &str) -> Result<bool> {
        let parsed = ObjectPath::parse(path)?;
        Ok(parsed.is_dir() && self.exists(path).await?)
    }

    /// Resolve a path to a descriptor: a file with its payload, or a folder.
    ///
    /// Buckets and the root are containers, not objects, and cannot be
    /// fetched.
    pub async fn get(&self, path: &str) -> Result<FsEntry> {
        let parsed = ObjectPath::parse(path)?;
        if parsed.is_root() || parsed.is_bucket() {
            return Err(Error::InvalidPath(format!(
                "'{path}' has no representable object"
            )));
        }
        if parsed.is_file() {
            let key = parsed.key();
            let data = self
                .store
                .get_object(parsed.bucket(), &key)
                .await
                .map_err(|e| relabel_not_found(e, path))?;
            let info = self
                .store
                .head_object(parsed.bucket(), &key)
                .await
                .map_err(|e| relabel_not_found(e, path))?;
            return Ok(FsEntry::File(FileEntry {
                name: parsed.filename().to_string(),
                path: parsed.as_str().to_string(),
                meta: meta_from_info(&info, false),
                data,
            }));
        }
        let key = parsed.key();
        let parent = parsed.parent_dir();
        let entries = self.entries_at(&parent).await?;
        let Some(info) = entries.into_iter().find(|info| info.key == key) else {
            return Err(Error::NotFound(path.to_string()));
        };
        Ok(FsEntry::Folder(FolderEntry {
            name: format!("{}/", parsed.dir_name()),
            path: parsed.as_str().to_string(),
            meta: meta_from_info(&info, true),
        }))
    }

    /// Write payload bytes to a file path.
    pub async fn put_data(
        &self,
        path: &str,
        data: Vec<u8>,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<()> {
        let file = file_path(path)?;
        let options = PutOptions {
            content_type: None,
            metadata: metadata.unwrap_or_default(),
        };
        self.store
            .put_object(file.bucket(), &file.key(), data, options)
            .await?;
        Ok(())
    }

    /// Upload a local file. A directory destination receives the local
    /// file's name; the content type is guessed from the extension.
    pub async fn put_file(
        &self,
        local: &Path,
        path: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<()> {
        let parsed = ObjectPath::parse(path)?;
        let target = if parsed.is_dir() {
            let name = local
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    Error::InvalidPath(format!("'{}' has no usable file name", local.display()))
                })?;
            parsed.join(name)?
        } else {
            parsed
        };
        let options = PutOptions {
            content_type: mime_guess::from_path(local).first_raw().map(str::to_owned),
            metadata: metadata.unwrap_or_default(),
        };
        self.store
            .put_object_from_file(target.bucket(), &target.key(), local, options)
            .await?;
        Ok(())
    }

    /// Remove a file or directory, `rm (-r)` style.
    pub async fn rm(&self, path: &str, recursive: bool) -> Result<()> {
        if self.is_dir(path).await? {
            return self.rmdir(path, recursive).await;
        }
        let parsed = ObjectPath::parse(path)?;
        self.store.delete_object(parsed.bucket(), &parsed.key()).await
    }

    /// Remove a directory. Without `recursive` the directory must be empty;
    /// with it, every key under the prefix is swept in batches before the
    /// marker (or bucket) goes away. `rm -r /` empties the whole store.
    pub async fn rmdir(&self, path: &str, recursive: bool) -> Result<()> {
        let dir = dir_path(path)?;
        if dir.is_root() {
            if recursive {
                return self.truncate().await;
            }
            return Err(Error::DirectoryNotEmpty(ROOT.to_string()));
        }
        if recursive {
            self.delete_prefix(&dir).await?;
        } else {
            let entries = self.entries_at(&dir).await?;
            if !entries.is_empty() {
                return Err(Error::DirectoryNotEmpty(path.to_string()));
            }
        }
        if dir.is_bucket() {
            self.store.delete_bucket(dir.bucket()).await.map_err(|e| match e {
                Error::DirectoryNotEmpty(_) => Error::DirectoryNotEmpty(path.to_string()),
                other => other,
            })
        } else if !recursive {
            // recursive deletion already swept the marker with the prefix
            self.store.delete_object(dir.bucket(), &dir.key()).await
        } else {
            Ok(())
        }
    }

    /// Remove every bucket recursively.
    pub async fn truncate(&self) -> Result<()> {
        for bucket in self.store.list_buckets().await? {
            let dir = ObjectPath::parse(&format!("/{}/", bucket.name))?;
            self.delete_prefix(&dir).await?;
            self.store.delete_bucket(dir.bucket()).await?;
        }
        Ok(())
    }

    /// Copy a file or, recursively, a directory, `cp (-r)` style.
    ///
    /// A file copied to a directory keeps its name. A directory copied into
    /// an existing directory nests under its own name; copied to a fresh
    /// path it becomes that path.
    pub async fn cp(&self, from: &str, to: &str, recursive: bool) -> Result<()> {
        let from_path = ObjectPath::parse(from)?;
        let to_path = ObjectPath::parse(to)?;
        let dest = self.destination(&from_path, &to_path).await?;
        if from_path.is_dir() {
            if !recursive {
                return Err(Error::General(format!(
                    "'{from}' is a directory; copying it requires recursive mode"
                )));
            }
            return self.copy_tree(&from_path, &dest).await;
        }
        self.store
            .copy_object(from_path.bucket(), &from_path.key(), dest.bucket(), &dest.key())
            .await
            .map_err(|e| relabel_not_found(e, from))?;
        Ok(())
    }

    /// Move a file or directory, `mv` style: copy, then remove the source
    /// once the copy succeeded and both sides exist.
    pub async fn mv(&self, from: &str, to: &str, recursive: bool) -> Result<()> {
        let from_path = ObjectPath::parse(from)?;
        let to_path = ObjectPath::parse(to)?;
        let dest = self.destination(&from_path, &to_path).await?;
        self.cp(from, to, recursive).await?;
        if self.exists(from).await? && self.exists(dest.as_str()).await? {
            self.rm(from, recursive).await?;
        }
        Ok(())
    }

    /// The most recently modified file in a directory, if any.
    pub async fn last_object(&self, path: &str) -> Result<Option<FsEntry>> {
        let dir = dir_path(path)?;
        let names = self.listdir(path, ListFilter::FilesOnly).await?;
        let Some(name) = names.into_iter().next() else {
            return Ok(None);
        };
        let full = dir.join(&name)?;
        Ok(Some(self.get(full.as_str()).await?))
    }

    /// A time-limited URL for downloading a file directly from the store.
    pub async fn presigned_get_url(&self, path: &str, expires_in: Duration) -> Result<String> {
        let file = file_path(path)?;
        self.store
            .presign_get(file.bucket(), &file.key(), expires_in)
            .await
    }

    /// A time-limited URL for uploading a file directly to the store.
    pub async fn presigned_put_url(&self, path: &str, expires_in: Duration) -> Result<String> {
        let file = file_path(path)?;
        let content_type = mime_guess::from_path(file.filename())
            .first_raw()
            .map(str::to_owned);
        self.store
            .presign_put(file.bucket(), &file.key(), expires_in, content_type)
            .await
    }

    /// Immediate children of a directory, newest first. The directory's own
    /// marker key lists under its prefix and is excluded.
    async fn entries_at(&self, dir: &ObjectPath) -> Result<Vec<ObjectInfo>> {
        let key = dir.key();
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;
        loop {
            let options = ListOptions {
                prefix: Some(key.clone()),
                recursive: false,
                max_keys: Some(1000),
                continuation_token: continuation_token.clone(),
            };
            let result = self.store.list_objects(dir.bucket(), options).await?;
            items.extend(result.items);
            if result.truncated {
                continuation_token = result.continuation_token;
            } else {
                break;
            }
        }
        items.retain(|info| info.key != key);
        items.sort_by(|a, b| mtime(b).cmp(&mtime(a)));
        Ok(items)
    }

    /// Batch-delete every key under the directory's prefix, marker included.
    /// Re-lists from the start after each sweep so pagination stays valid
    /// while keys disappear.
    async fn delete_prefix(&self, dir: &ObjectPath) -> Result<()> {
        loop {
            let options = ListOptions {
                prefix: Some(dir.key()),
                recursive: true,
                max_keys: Some(1000),
                continuation_token: None,
            };
            let result = self.store.list_objects(dir.bucket(), options).await?;
            if result.items.is_empty() {
                break;
            }
            let truncated = result.truncated;
            let keys: Vec<String> = result.items.into_iter().map(|info| info.key).collect();
            tracing::debug!(bucket = dir.bucket(), count = keys.len(), "deleting keys under prefix");
            self.store.delete_objects(dir.bucket(), keys).await?;
            if !truncated {
                break;
            }
        }
        Ok(())
    }

    /// Where a copy of `from` lands when the caller said `to`.
    async fn destination(&self, from: &ObjectPath, to: &ObjectPath) -> Result<ObjectPath> {
        if from.is_file() {
            return ObjectPath::resolve_destination(from, to);
        }
        if !to.is_dir() {
            return Err(Error::InvalidPath(format!(
                "cannot copy directory '{from}' onto file path '{to}'"
            )));
        }
        if self.exists(to.as_str()).await? {
            return to.join(&format!("{}/", from.dir_name()));
        }
        Ok(to.clone())
    }

    /// Breadth-first server-side copy of a directory tree. Directories that
    /// contain no subdirectories are recreated explicitly so empty ones
    /// survive; everything else falls out of the copied keys.
    async fn copy_tree(&self, from: &ObjectPath, to: &ObjectPath) -> Result<()> {
        tracing::debug!(%from, %to, "copying tree");
        let mut files = Vec::new();
        let mut queue = VecDeque::from([from.clone()]);
        while let Some(dir) = queue.pop_front() {
            let entries = self.entries_at(&dir).await?;
            let mut subdirs = Vec::new();
            for info in entries {
                let child = format!("/{}/{}", dir.bucket(), info.key);
                if info.is_dir {
                    subdirs.push(ObjectPath::parse(&child)?);
                } else {
                    files.push(ObjectPath::parse(&child)?);
                }
            }
            if subdirs.is_empty() {
                let target = rebase(&dir, from, to)?;
                self.mkdirs(target.as_str()).await?;
            }
            queue.extend(subdirs);
        }
        for file in files {
            let target = rebase(&file, from, to)?;
            self.store
                .copy_object(file.bucket(), &file.key(), target.bucket(), &target.key())
                .await?;
        }
        Ok(())
    }
}

fn dir_path(path: &str) -> Result<ObjectPath> {
    let parsed = ObjectPath::parse(path)?;
    if parsed.is_file() {
        return Err(Error::InvalidPath(format!(
            "'{path}' is not a directory path (directories end with '/')"
        )));
    }
    Ok(parsed)
}

fn file_path(path: &str) -> Result<ObjectPath> {
    let parsed = ObjectPath::parse(path)?;
    if !parsed.is_file() {
        return Err(Error::InvalidPath(format!("'{path}' is not a file path")));
    }
    Ok(parsed)
}

fn entry_from_info(dir_key: &str, info: ObjectInfo) -> DirEntry {
    let name = info
        .key
        .strip_prefix(dir_key)
        .unwrap_or(info.key.as_str())
        .to_string();
    DirEntry {
        name,
        is_dir: info.is_dir,
        size_bytes: info.size_bytes,
        last_modified: info.last_modified,
    }
}

fn meta_from_info(info: &ObjectInfo, is_dir: bool) -> ObjectMeta {
    ObjectMeta {
        is_dir,
        last_modified: info.last_modified.unwrap_or(Timestamp::UNIX_EPOCH),
        size_bytes: info.size_bytes.unwrap_or(0),
        content_type: info.content_type.clone(),
        etag: info.etag.clone(),
        user: normalize_user_metadata(&info.user_metadata),
    }
}

fn mtime(info: &ObjectInfo) -> Timestamp {
    info.last_modified.unwrap_or(Timestamp::UNIX_EPOCH)
}

fn relabel_not_found(err: Error, path: &str) -> Error {
    match err {
        Error::NotFound(_) => Error::NotFound(path.to_string()),
        other => other,
    }
}

/// Map a path under `from` onto the corresponding path under `to`.
fn rebase(path: &ObjectPath, from: &ObjectPath, to: &ObjectPath) -> Result<ObjectPath> {
    let relative = path.as_str().strip_prefix(from.as_str()).unwrap_or("");
    to.join(relative)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::*;
    use crate::traits::{BucketInfo, ListResult, MockObjectStore};

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_second(secs).unwrap()
    }

    fn file_at(key: &str, modified: i64) -> ObjectInfo {
        let mut info = ObjectInfo::file(key, 4);
        info.last_modified = Some(ts(modified));
        info
    }

    fn page(items: Vec<ObjectInfo>) -> ListResult {
        ListResult {
            items,
            truncated: false,
            continuation_token: None,
        }
    }

    #[tokio::test]
    async fn test_mkdirs_creates_bucket_and_marker() {
        let mut store = MockObjectStore::new();
        store
            .expect_bucket_exists()
            .with(eq("foo"))
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_create_bucket()
            .with(eq("foo"))
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_put_object()
            .withf(|bucket, key, data, _| bucket == "foo" && key == "bar/baz/" && data.is_empty())
            .times(1)
            .returning(|_, key, _, _| Ok(ObjectInfo::file(key, 0)));

        let fs = ObjectFs::new(store);
        fs.mkdirs("/foo/bar/baz/").await.unwrap();
    }

    #[tokio::test]
    async fn test_mkdirs_bucket_only_writes_no_marker() {
        let mut store = MockObjectStore::new();
        store
            .expect_bucket_exists()
            .with(eq("foo"))
            .returning(|_| Ok(true));
        store.expect_put_object().never();

        let fs = ObjectFs::new(store);
        fs.mkdirs("/foo/").await.unwrap();
    }

    #[tokio::test]
    async fn test_mkdirs_rejects_root_and_file_paths() {
        let fs = ObjectFs::new(MockObjectStore::new());
        assert!(matches!(fs.mkdirs("/").await, Err(Error::InvalidPath(_))));
        assert!(matches!(
            fs.mkdirs("/foo/bar").await,
            Err(Error::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_listdir_root_lists_buckets_newest_first() {
        let mut store = MockObjectStore::new();
        store.expect_list_buckets().returning(|| {
            Ok(vec![
                BucketInfo {
                    name: "older".to_string(),
                    created: Some(ts(100)),
                },
                BucketInfo {
                    name: "newer".to_string(),
                    created: Some(ts(200)),
                },
            ])
        });

        let fs = ObjectFs::new(store);
        assert_eq!(
            fs.listdir("/", ListFilter::All).await.unwrap(),
            vec!["newer/", "older/"]
        );
        assert!(
            fs.listdir("/", ListFilter::FilesOnly)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_listdir_sorts_and_filters() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|bucket, options| {
                bucket == "foo" && options.prefix.as_deref() == Some("bar/") && !options.recursive
            })
            .returning(|_, _| {
                Ok(page(vec![
                    // the directory's own marker must not show up as a child
                    ObjectInfo::file("bar/", 0),
                    file_at("bar/old", 100),
                    file_at("bar/new", 200),
                    ObjectInfo::dir("bar/sub/"),
                ]))
            });

        let fs = ObjectFs::new(store);
        assert_eq!(
            fs.listdir("/foo/bar/", ListFilter::All).await.unwrap(),
            vec!["new", "old", "sub/"]
        );
        assert_eq!(
            fs.listdir("/foo/bar/", ListFilter::FilesOnly).await.unwrap(),
            vec!["new", "old"]
        );
        assert_eq!(
            fs.listdir("/foo/bar/", ListFilter::DirsOnly).await.unwrap(),
            vec!["sub/"]
        );
    }

    #[tokio::test]
    async fn test_listdir_paginates() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list_objects()
            .withf(|_, options| options.continuation_token.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(ListResult {
                    items: vec![file_at("bar/a", 100)],
                    truncated: true,
                    continuation_token: Some("next".to_string()),
                })
            });
        store
            .expect_list_objects()
            .withf(|_, options| options.continuation_token.as_deref() == Some("next"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(vec![file_at("bar/b", 200)])));

        let fs = ObjectFs::new(store);
        assert_eq!(
            fs.listdir("/foo/bar/", ListFilter::All).await.unwrap(),
            vec!["b", "a"]
        );
    }

    #[tokio::test]
    async fn test_exists() {
        let mut store = MockObjectStore::new();
        store
            .expect_bucket_exists()
            .with(eq("foo"))
            .returning(|_| Ok(true));
        store
            .expect_bucket_exists()
            .with(eq("ghost"))
            .returning(|_| Ok(false));
        store
            .expect_get_object()
            .with(eq("foo"), eq("present"))
            .returning(|_, _| Ok(Bytes::from_static(b"test")));
        store
            .expect_head_object()
            .with(eq("foo"), eq("present"))
            .returning(|_, key| Ok(ObjectInfo::file(key, 4)));
        store
            .expect_get_object()
            .with(eq("foo"), eq("absent"))
            .returning(|_, key| Err(Error::NotFound(key.to_string())));

        let fs = ObjectFs::new(store);
        assert!(fs.exists("/").await.unwrap());
        assert!(fs.exists("/foo/").await.unwrap());
        assert!(fs.exists("/foo/present").await.unwrap());
        assert!(!fs.exists("/foo/absent").await.unwrap());
        assert!(!fs.exists("/ghost/").await.unwrap());
        // a bare bucket name is not a valid file path, hence absent
        assert!(!fs.exists("/foo").await.unwrap());
        assert!(!fs.exists("no-leading-slash").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_file_builds_descriptor() {
        let mut store = MockObjectStore::new();
        store
            .expect_get_object()
            .with(eq("foo"), eq("bar/baz"))
            .returning(|_, _| Ok(Bytes::from_static(b"test")));
        store.expect_head_object().returning(|_, key| {
            let mut info = ObjectInfo::file(key, 4);
            info.last_modified = Some(ts(100));
            info.content_type = Some("text/plain".to_string());
            info.user_metadata
                .insert("X-Amz-Meta-Color".to_string(), "red".to_string());
            Ok(info)
        });

        let fs = ObjectFs::new(store);
        let entry = fs.get("/foo/bar/baz").await.unwrap();
        assert!(entry.is_file());
        assert_eq!(entry.name(), "baz");
        assert_eq!(entry.path(), "/foo/bar/baz");
        assert_eq!(entry.meta().size_bytes, 4);
        assert_eq!(entry.meta().last_modified, ts(100));
        assert_eq!(entry.meta().user.get("color").map(String::as_str), Some("red"));
        assert_eq!(entry.data().unwrap().as_ref(), b"test");
    }

    #[tokio::test]
    async fn test_get_folder_resolves_via_parent_listing() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|bucket, options| bucket == "foo" && options.prefix.as_deref() == Some("bar/"))
            .returning(|_, _| Ok(page(vec![ObjectInfo::dir("bar/sub/")])));

        let fs = ObjectFs::new(store);
        let entry = fs.get("/foo/bar/sub/").await.unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.name(), "sub/");
        assert!(entry.meta().is_dir);

        assert!(matches!(
            fs.get("/foo/bar/missing/").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_rejects_root_and_buckets() {
        let fs = ObjectFs::new(MockObjectStore::new());
        assert!(matches!(fs.get("/").await, Err(Error::InvalidPath(_))));
        assert!(matches!(fs.get("/foo/").await, Err(Error::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_put_data_passes_metadata_through() {
        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .withf(|bucket, key, data, options| {
                bucket == "foo"
                    && key == "bar/baz"
                    && data == b"test"
                    && options.metadata.get("color").map(String::as_str) == Some("red")
            })
            .times(1)
            .returning(|_, key, data, _| Ok(ObjectInfo::file(key, data.len() as i64)));

        let fs = ObjectFs::new(store);
        let metadata = HashMap::from([("color".to_string(), "red".to_string())]);
        fs.put_data("/foo/bar/baz", b"test".to_vec(), Some(metadata))
            .await
            .unwrap();

        assert!(matches!(
            fs.put_data("/foo/bar/", Vec::new(), None).await,
            Err(Error::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_rmdir_non_recursive_requires_empty() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(page(vec![file_at("bar/baz", 100)])));
        store.expect_delete_object().never();
        store.expect_delete_objects().never();

        let fs = ObjectFs::new(store);
        assert!(matches!(
            fs.rmdir("/foo/bar/", false).await,
            Err(Error::DirectoryNotEmpty(_))
        ));
    }

    #[tokio::test]
    async fn test_rmdir_non_recursive_empty_removes_marker() {
        let mut store = MockObjectStore::new();
        // only the marker itself lists under the prefix
        store
            .expect_list_objects()
            .returning(|_, _| Ok(page(vec![ObjectInfo::file("bar/", 0)])));
        store
            .expect_delete_object()
            .with(eq("foo"), eq("bar/"))
            .times(1)
            .returning(|_, _| Ok(()));

        let fs = ObjectFs::new(store);
        fs.rmdir("/foo/bar/", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_rmdir_recursive_sweeps_prefix() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list_objects()
            .withf(|bucket, options| {
                bucket == "foo" && options.prefix.as_deref() == Some("bar/") && options.recursive
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(page(vec![
                    ObjectInfo::file("bar/", 0),
                    file_at("bar/a", 100),
                    ObjectInfo::file("bar/sub/", 0),
                    file_at("bar/sub/b", 200),
                ]))
            });
        store
            .expect_delete_objects()
            .withf(|bucket, keys| {
                bucket == "foo"
                    && keys.len() == 4
                    && keys.contains(&"bar/".to_string())
                    && keys.contains(&"bar/sub/b".to_string())
            })
            .times(1)
            .returning(|_, keys| Ok(keys));
        store.expect_delete_object().never();
        store.expect_delete_bucket().never();

        let fs = ObjectFs::new(store);
        fs.rmdir("/foo/bar/", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_rmdir_bucket_maps_not_empty_error() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().returning(|_, _| Ok(page(vec![])));
        store
            .expect_delete_bucket()
            .with(eq("foo"))
            .returning(|bucket| Err(Error::DirectoryNotEmpty(bucket.to_string())));

        let fs = ObjectFs::new(store);
        match fs.rmdir("/foo/", false).await {
            Err(Error::DirectoryNotEmpty(path)) => assert_eq!(path, "/foo/"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rmdir_root_without_recursive_is_refused() {
        let fs = ObjectFs::new(MockObjectStore::new());
        assert!(matches!(
            fs.rmdir("/", false).await,
            Err(Error::DirectoryNotEmpty(_))
        ));
    }

    #[tokio::test]
    async fn test_truncate_empties_every_bucket() {
        let mut store = MockObjectStore::new();
        store.expect_list_buckets().times(1).returning(|| {
            Ok(vec![BucketInfo {
                name: "foo".to_string(),
                created: None,
            }])
        });
        store
            .expect_list_objects()
            .withf(|bucket, options| {
                bucket == "foo" && options.prefix.as_deref() == Some("") && options.recursive
            })
            .times(1)
            .returning(|_, _| Ok(page(vec![file_at("x", 100)])));
        store
            .expect_delete_objects()
            .withf(|_, keys| keys == &["x".to_string()])
            .times(1)
            .returning(|_, keys| Ok(keys));
        store
            .expect_delete_bucket()
            .with(eq("foo"))
            .times(1)
            .returning(|_| Ok(()));

        let fs = ObjectFs::new(store);
        fs.rmdir("/", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_rm_file_deletes_single_key() {
        let mut store = MockObjectStore::new();
        store
            .expect_delete_object()
            .with(eq("foo"), eq("bar/baz"))
            .times(1)
            .returning(|_, _| Ok(()));

        let fs = ObjectFs::new(store);
        fs.rm("/foo/bar/baz", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_cp_file_into_directory_keeps_name() {
        let mut store = MockObjectStore::new();
        store
            .expect_copy_object()
            .withf(|src_bucket, src_key, dst_bucket, dst_key| {
                src_bucket == "foo"
                    && src_key == "baz"
                    && dst_bucket == "foo"
                    && dst_key == "bar2/baz"
            })
            .times(1)
            .returning(|_, _, _, dst_key| Ok(ObjectInfo::file(dst_key, 4)));

        let fs = ObjectFs::new(store);
        fs.cp("/foo/baz", "/foo/bar2/", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_cp_directory_requires_recursive() {
        let mut store = MockObjectStore::new();
        store
            .expect_bucket_exists()
            .with(eq("baz"))
            .returning(|_| Ok(false));

        let fs = ObjectFs::new(store);
        assert!(matches!(
            fs.cp("/foo/bar/", "/baz/", false).await,
            Err(Error::General(_))
        ));
    }

    #[tokio::test]
    async fn test_cp_directory_onto_file_path_is_refused() {
        let fs = ObjectFs::new(MockObjectStore::new());
        assert!(matches!(
            fs.cp("/foo/bar/", "/foo/file", true).await,
            Err(Error::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_cp_recursive_copies_tree() {
        let mut store = MockObjectStore::new();
        // destination bucket does not exist yet, so /dst/ is taken verbatim
        store
            .expect_bucket_exists()
            .with(eq("dst"))
            .times(2)
            .returning(|_| Ok(false));
        store
            .expect_list_objects()
            .withf(|bucket, options| bucket == "foo" && options.prefix.as_deref() == Some("src/"))
            .returning(|_, _| {
                Ok(page(vec![file_at("src/a", 100), ObjectInfo::dir("src/sub/")]))
            });
        store
            .expect_list_objects()
            .withf(|bucket, options| {
                bucket == "foo" && options.prefix.as_deref() == Some("src/sub/")
            })
            .returning(|_, _| Ok(page(vec![])));
        store
            .expect_create_bucket()
            .with(eq("dst"))
            .times(1)
            .returning(|_| Ok(()));
        // empty subdirectory is recreated explicitly
        store
            .expect_put_object()
            .withf(|bucket, key, data, _| bucket == "dst" && key == "sub/" && data.is_empty())
            .times(1)
            .returning(|_, key, _, _| Ok(ObjectInfo::file(key, 0)));
        store
            .expect_copy_object()
            .withf(|src_bucket, src_key, dst_bucket, dst_key| {
                src_bucket == "foo" && src_key == "src/a" && dst_bucket == "dst" && dst_key == "a"
            })
            .times(1)
            .returning(|_, _, _, dst_key| Ok(ObjectInfo::file(dst_key, 4)));

        let fs = ObjectFs::new(store);
        fs.cp("/foo/src/", "/dst/", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_mv_file_copies_then_removes_source() {
        let mut store = MockObjectStore::new();
        store
            .expect_copy_object()
            .withf(|_, src_key, _, dst_key| src_key == "a" && dst_key == "dir/a")
            .times(1)
            .returning(|_, _, _, dst_key| Ok(ObjectInfo::file(dst_key, 4)));
        store
            .expect_bucket_exists()
            .with(eq("foo"))
            .returning(|_| Ok(true));
        store
            .expect_get_object()
            .returning(|_, _| Ok(Bytes::from_static(b"test")));
        store
            .expect_head_object()
            .returning(|_, key| Ok(ObjectInfo::file(key, 4)));
        store
            .expect_delete_object()
            .with(eq("foo"), eq("a"))
            .times(1)
            .returning(|_, _| Ok(()));

        let fs = ObjectFs::new(store);
        fs.mv("/foo/a", "/foo/dir/", false).await.unwrap();
    }

    #[tokio::test]
    async fn test_last_object_picks_newest_file() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|_, options| options.prefix.as_deref() == Some("logs/"))
            .returning(|_, _| {
                Ok(page(vec![
                    file_at("logs/older", 100),
                    file_at("logs/newest", 300),
                    ObjectInfo::dir("logs/archive/"),
                ]))
            });
        store
            .expect_get_object()
            .with(eq("foo"), eq("logs/newest"))
            .times(1)
            .returning(|_, _| Ok(Bytes::from_static(b"test")));
        store
            .expect_head_object()
            .returning(|_, key| Ok(ObjectInfo::file(key, 4)));

        let fs = ObjectFs::new(store);
        let entry = fs.last_object("/foo/logs/").await.unwrap().unwrap();
        assert_eq!(entry.name(), "newest");
    }

    #[tokio::test]
    async fn test_last_object_none_for_directory_of_dirs() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Ok(page(vec![ObjectInfo::dir("logs/archive/")])));

        let fs = ObjectFs::new(store);
        assert!(fs.last_object("/foo/logs/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_presigned_urls_require_file_paths() {
        let mut store = MockObjectStore::new();
        store
            .expect_presign_get()
            .withf(|bucket, key, expires| {
                bucket == "foo" && key == "bar/baz" && *expires == Duration::from_secs(60)
            })
            .times(1)
            .returning(|_, _, _| Ok("https://signed.example/get".to_string()));

        let fs = ObjectFs::new(store);
        let url = fs
            .presigned_get_url("/foo/bar/baz", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.starts_with("https://"));

        assert!(matches!(
            fs.presigned_get_url("/foo/bar/", Duration::from_secs(60)).await,
            Err(Error::InvalidPath(_))
        ));
    }
}
