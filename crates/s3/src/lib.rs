//! ofs-s3: aws-sdk-s3 backend for the ofs client
//!
//! [`S3Client`] implements the `ObjectStore` trait from `ofs-core` on top of
//! `aws-sdk-s3`, and [`connect`] builds a ready-to-use facade from a
//! [`Connection`].

mod client;

pub use client::S3Client;

use ofs_core::{Connection, ObjectFs, Result};

/// Build an [`ObjectFs`] talking to the endpoint described by `conn`.
pub async fn connect(conn: Connection) -> Result<ObjectFs<S3Client>> {
    Ok(ObjectFs::new(S3Client::new(conn).await?))
}
