//! S3 object store.
//!
//! Credentials and region come from the standard AWS provider chain
//! (environment, shared profile, instance metadata). The SDK is async, so the
//! store owns a current-thread Tokio runtime and blocks on each call; callers
//! stay fully synchronous.

use super::{ObjectBody, ObjectLocation, ObjectStore, StorageError};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Runtime;
use tracing::debug;

/// User metadata key holding the payload's blake3 digest.
pub const DIGEST_METADATA_KEY: &str = "content-blake3";

/// S3-backed object store.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    runtime: Runtime,
}

impl S3Store {
    /// Build a client from the ambient AWS configuration.
    pub fn from_env() -> Result<Self, StorageError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StorageError::Runtime(e.to_string()))?;
        let config = runtime.block_on(aws_config::defaults(BehaviorVersion::latest()).load());
        Ok(Self {
            client: aws_sdk_s3::Client::new(&config),
            runtime,
        })
    }
}

impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        "s3"
    }

    fn put(&self, location: &ObjectLocation, body: &ObjectBody) -> Result<(), StorageError> {
        let (bucket, key) = match location {
            ObjectLocation::S3 { bucket, key } => (bucket, key),
            other => {
                return Err(StorageError::WrongBackend {
                    backend: self.name().to_string(),
                    location: other.to_string(),
                })
            }
        };
        if key.is_empty() {
            return Err(StorageError::MissingKey(location.to_string()));
        }

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(body.content_type.as_str())
            .metadata(DIGEST_METADATA_KEY, body.digest.as_str())
            .body(ByteStream::from(body.bytes.clone()))
            .send();

        let output = self
            .runtime
            .block_on(request)
            .map_err(|e| StorageError::S3(DisplayErrorContext(&e).to_string()))?;

        debug!(
            bucket = %bucket,
            key = %key,
            etag = output.e_tag().unwrap_or_default(),
            "put S3 object"
        );
        Ok(())
    }
}
