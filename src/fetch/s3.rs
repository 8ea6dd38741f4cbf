//! Amazon S3 object store.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use log::debug;
use tokio::io::AsyncWriteExt;

use super::ObjectStore;
use crate::error_handling::{FetchFailureKind, ObjectStoreError};
use crate::event::ObjectLocation;

/// Downloads objects with `GetObject`, streaming the body to the destination file.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Wraps an existing S3 client.
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Builds a client from shared AWS configuration.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(aws_sdk_s3::Client::new(sdk_config))
    }
}

/// Maps a `GetObject` failure to a fetch failure kind.
fn classify<R>(err: &SdkError<GetObjectError, R>, status: Option<u16>) -> FetchFailureKind {
    if err
        .as_service_error()
        .map(GetObjectError::is_no_such_key)
        .unwrap_or(false)
    {
        return FetchFailureKind::NotFound;
    }
    match status {
        Some(404) => FetchFailureKind::NotFound,
        Some(401) | Some(403) => FetchFailureKind::Forbidden,
        _ => FetchFailureKind::Unavailable,
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn download(
        &self,
        location: &ObjectLocation,
        destination: &Path,
    ) -> Result<(), ObjectStoreError> {
        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                ObjectStoreError::new(classify(&e, status), DisplayErrorContext(&e).to_string())
            })?;

        let mut body = output.body;
        let mut file = tokio::fs::File::create(destination).await?;
        let mut written = 0usize;
        while let Some(chunk) = body.try_next().await.map_err(|e| {
            ObjectStoreError::new(
                FetchFailureKind::Unavailable,
                format!("failed reading body of {location}: {e}"),
            )
        })? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!("Downloaded {written} bytes from s3://{location}");
        Ok(())
    }
}
