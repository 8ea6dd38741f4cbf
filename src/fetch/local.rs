//! Filesystem-backed object store.
//!
//! Buckets map to directories under a root, keys to relative paths inside them.
//! Used by the offline `import` subcommand.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::ObjectStore;
use crate::error_handling::{FetchFailureKind, ObjectStoreError};
use crate::event::ObjectLocation;

/// Object store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Serves buckets as subdirectories of `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Builds a store and location serving a single file, with its directory as the bucket.
    pub fn for_file(path: &Path) -> Result<(Self, ObjectLocation), ObjectStoreError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ObjectStoreError::not_found(format!("{} is not a file path", path.display()))
            })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok((Self::new(directory), ObjectLocation::new(".", file_name)))
    }

    /// Resolves a location to a path, refusing keys that escape the bucket.
    fn resolve(&self, location: &ObjectLocation) -> Result<PathBuf, ObjectStoreError> {
        let key = Path::new(&location.key);
        let escapes = key
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ObjectStoreError::new(
                FetchFailureKind::Forbidden,
                format!("key {:?} is outside bucket {:?}", location.key, location.bucket),
            ));
        }
        Ok(self.root.join(&location.bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn download(
        &self,
        location: &ObjectLocation,
        destination: &Path,
    ) -> Result<(), ObjectStoreError> {
        let source = self.resolve(location)?;
        tokio::fs::copy(&source, destination)
            .await
            .map_err(|e| {
                let mut err = ObjectStoreError::from(e);
                err.message = format!("{}: {}", source.display(), err.message);
                err
            })?;
        Ok(())
    }
}
