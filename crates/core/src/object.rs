//! Object descriptors returned by the facade.
//!
//! Every descriptor is built from a single store response and owns its data;
//! nothing here is cached or kept alive across calls.

use std::collections::HashMap;

use bytes::Bytes;
use jiff::Timestamp;
use serde::Serialize;

/// Metadata attached to a file or folder descriptor.
///
/// `user` holds the caller-supplied metadata pairs with storage-header
/// artifacts normalized away; timestamps default to the Unix epoch when the
/// store reports none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMeta {
    pub is_dir: bool,
    pub last_modified: Timestamp,
    pub size_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub user: HashMap<String, String>,
}

/// A file descriptor with its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub meta: ObjectMeta,
    pub data: Bytes,
}

/// A folder descriptor. Folder names carry a trailing `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
    pub meta: ObjectMeta,
}

/// A resolved hierarchy entry: file or folder.
#[derive(Debug, Clone, PartialEq)]
pub enum FsEntry {
    File(FileEntry),
    Folder(FolderEntry),
}

impl FsEntry {
    pub fn name(&self) -> &str {
        match self {
            FsEntry::File(f) => &f.name,
            FsEntry::Folder(d) => &d.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FsEntry::File(f) => &f.path,
            FsEntry::Folder(d) => &d.path,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        match self {
            FsEntry::File(f) => &f.meta,
            FsEntry::Folder(d) => &d.meta,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FsEntry::File(_))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, FsEntry::Folder(_))
    }

    /// Payload bytes when this entry is a file.
    pub fn data(&self) -> Option<&Bytes> {
        match self {
            FsEntry::File(f) => Some(&f.data),
            FsEntry::Folder(_) => None,
        }
    }

    pub fn into_file(self) -> Option<FileEntry> {
        match self {
            FsEntry::File(f) => Some(f),
            FsEntry::Folder(_) => None,
        }
    }
}

/// One row of a directory listing. Directories are inferred from common
/// prefixes, files from actual keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

/// Strip `X-Amz-Meta-` header prefixes and lowercase keys. Stores echo user
/// metadata back through HTTP headers, which mangles the keys the caller
/// originally supplied.
pub fn normalize_user_metadata(raw: &HashMap<String, String>) -> HashMap<String, String> {
    const HEADER_PREFIX: &str = "x-amz-meta-";
    raw.iter()
        .map(|(key, value)| {
            let key = match key.split_at_checked(HEADER_PREFIX.len()) {
                Some((head, tail)) if head.eq_ignore_ascii_case(HEADER_PREFIX) => tail,
                _ => key.as_str(),
            };
            (key.to_lowercase(), value.clone())
        })
        .collect()
}
