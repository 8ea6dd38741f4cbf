//! Object retrieval.
//!
//! An [`ObjectStore`] downloads an object to a local path. [`fetch_text`] wraps
//! that in a scoped temporary file so the transient copy is removed on every
//! exit path, then decodes the contents as text.

mod local;
mod s3;

use std::path::Path;

use async_trait::async_trait;
use log::debug;

use crate::config::TRANSIENT_FILE_PREFIX;
use crate::error_handling::ObjectStoreError;
use crate::event::ObjectLocation;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// Source of imported objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes the full contents of `location` to `destination`, replacing it.
    async fn download(
        &self,
        location: &ObjectLocation,
        destination: &Path,
    ) -> Result<(), ObjectStoreError>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    async fn download(
        &self,
        location: &ObjectLocation,
        destination: &Path,
    ) -> Result<(), ObjectStoreError> {
        (**self).download(location, destination).await
    }
}

/// Downloads `location` into a transient file and returns its contents as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected. The transient
/// file is deleted before returning, including when the download or read fails.
///
/// # Errors
///
/// Returns the store's `ObjectStoreError`, or an `Io` kind error if the
/// transient file cannot be created or read.
pub async fn fetch_text<S>(store: &S, location: &ObjectLocation) -> Result<String, ObjectStoreError>
where
    S: ObjectStore + ?Sized,
{
    let transient = tempfile::Builder::new()
        .prefix(TRANSIENT_FILE_PREFIX)
        .suffix(".txt")
        .tempfile()?;
    debug!("Downloading {} to {}", location, transient.path().display());

    store.download(location, transient.path()).await?;
    let bytes = tokio::fs::read(transient.path()).await?;

    // Dropping would also remove it; closing surfaces the removal error.
    transient.close()?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
