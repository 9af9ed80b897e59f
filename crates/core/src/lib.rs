//! ofs-core: SDK-independent layer of the ofs client
//!
//! This crate provides:
//! - Path translation between `/bucket/dir/file` paths and bucket/key space
//! - Object descriptors (files with payloads, folders, listing entries)
//! - The `ObjectStore` trait at the boundary to the wrapped storage client
//! - The `ObjectFs` facade with the filesystem verbs
//! - Connection/profile configuration and retry machinery
//!
//! Nothing here depends on a specific storage SDK; `ofs-s3` plugs
//! `aws-sdk-s3` in behind the trait.

pub mod config;
pub mod error;
pub mod fs;
pub mod object;
pub mod path;
pub mod retry;
pub mod traits;

pub use config::{Connection, Profile, ProfileStore, RetryConfig};
pub use error::{Error, Result};
pub use fs::{ListFilter, ObjectFs};
pub use object::{DirEntry, FileEntry, FolderEntry, FsEntry, ObjectMeta};
pub use path::{ObjectPath, ROOT};
pub use traits::{BucketInfo, ListOptions, ListResult, ObjectInfo, ObjectStore, PutOptions};
