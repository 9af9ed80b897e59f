//! Path translation between the filesystem hierarchy and bucket/key space.
//!
//! Paths are absolute and slash-separated: `/bucket/dir/sub/file`. A trailing
//! slash marks a directory; the first segment is the bucket; everything after
//! it is the storage key. Directory keys keep their trailing slash, so the
//! key of `/assets/img/icons/` is `img/icons/`.

use std::fmt;

use crate::error::{Error, Result};

/// The root of the hierarchy, listing all buckets.
pub const ROOT: &str = "/";

/// A parsed hierarchy path.
///
/// Parsing is a pure function of the input string: repeated slashes collapse,
/// and the bucket/prefix/filename split is derived once. A bare `/bucket`
/// without the trailing slash is rejected, because a file cannot live outside
/// a bucket and a bucket reference is spelled `/bucket/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    path: String,
    bucket: String,
    prefix: String,
    filename: String,
}

impl ObjectPath {
    /// Parse an absolute hierarchy path.
    pub fn parse(raw: &str) -> Result<Self> {
        let path = collapse_slashes(raw);
        if path == ROOT {
            return Ok(Self::root());
        }
        let Some(rest) = path.strip_prefix('/') else {
            return Err(Error::InvalidPath(format!(
                "'{raw}' must be absolute (start with '/')"
            )));
        };
        let Some((bucket, remainder)) = rest.split_once('/') else {
            return Err(Error::InvalidPath(format!(
                "'{raw}' names a bucket without a trailing '/'"
            )));
        };
        let (prefix, filename) = match remainder.rfind('/') {
            None => (String::new(), remainder.to_string()),
            Some(i) if i + 1 == remainder.len() => (remainder.to_string(), String::new()),
            Some(i) => (remainder[..=i].to_string(), remainder[i + 1..].to_string()),
        };
        let bucket = bucket.to_string();
        Ok(Self {
            path,
            bucket,
            prefix,
            filename,
        })
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self {
            path: ROOT.to_string(),
            bucket: String::new(),
            prefix: String::new(),
            filename: String::new(),
        }
    }

    /// The normalized path string.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key prefix inside the bucket, empty or ending with `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Final segment when the path names a file, otherwise empty.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The storage key: `prefix` for directories, `prefix + filename` for
    /// files, empty for buckets and the root.
    pub fn key(&self) -> String {
        format!("{}{}", self.prefix, self.filename)
    }

    pub fn is_root(&self) -> bool {
        self.bucket.is_empty()
    }

    pub fn is_bucket(&self) -> bool {
        !self.bucket.is_empty() && self.prefix.is_empty() && self.filename.is_empty()
    }

    pub fn is_dir(&self) -> bool {
        self.filename.is_empty()
    }

    pub fn is_file(&self) -> bool {
        !self.is_dir()
    }

    /// Append a relative name to a directory path. A trailing slash on
    /// `name` yields a directory path; `name` may span several segments.
    pub fn join(&self, name: &str) -> Result<Self> {
        if self.is_file() {
            return Err(Error::InvalidPath(format!(
                "'{self}' is not a directory, cannot join '{name}'"
            )));
        }
        Self::parse(&format!("{}{}", self.path, name))
    }

    /// Name of the final directory component: the bucket for `/bucket/`, the
    /// last prefix segment otherwise. Empty for files and the root.
    pub fn dir_name(&self) -> &str {
        if self.is_file() || self.is_root() {
            return "";
        }
        let trimmed = self.prefix.trim_end_matches('/');
        if trimmed.is_empty() {
            return &self.bucket;
        }
        match trimmed.rfind('/') {
            Some(i) => &trimmed[i + 1..],
            None => trimmed,
        }
    }

    /// The containing directory. The parent of a bucket (or the root) is the
    /// root itself.
    pub fn parent_dir(&self) -> Self {
        if self.is_root() || self.is_bucket() {
            return Self::root();
        }
        let prefix = if self.is_file() {
            self.prefix.clone()
        } else {
            let trimmed = self.prefix.trim_end_matches('/');
            match trimmed.rfind('/') {
                Some(i) => trimmed[..=i].to_string(),
                None => String::new(),
            }
        };
        Self {
            path: format!("/{}/{}", self.bucket, prefix),
            bucket: self.bucket.clone(),
            prefix,
            filename: String::new(),
        }
    }

    /// Destination inference for file copies, `cp` style: a file destination
    /// is taken verbatim, a directory destination receives the source's
    /// filename.
    ///
    /// ```
    /// use ofs_core::path::ObjectPath;
    ///
    /// let src = ObjectPath::parse("/foo/bar1/baz").unwrap();
    /// let into_dir = ObjectPath::parse("/foo/bar2/").unwrap();
    /// let dest = ObjectPath::resolve_destination(&src, &into_dir).unwrap();
    /// assert_eq!(dest.as_str(), "/foo/bar2/baz");
    ///
    /// let renamed = ObjectPath::parse("/foo/bar2/baz2").unwrap();
    /// let dest = ObjectPath::resolve_destination(&src, &renamed).unwrap();
    /// assert_eq!(dest.as_str(), "/foo/bar2/baz2");
    /// ```
    pub fn resolve_destination(src: &Self, dst: &Self) -> Result<Self> {
        if !src.is_file() {
            return Err(Error::InvalidPath(format!(
                "'{src}' is not a file path"
            )));
        }
        if dst.is_file() {
            Ok(dst.clone())
        } else {
            dst.join(&src.filename)
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

fn collapse_slashes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_slash = false;
    for c in raw.chars() {
        if c == '/' {
            if !last_was_slash {
                out.push(c);
            }
            last_was_slash = true;
        } else {
            out.push(c);
            last_was_slash = false;
        }
    }
    out
}
