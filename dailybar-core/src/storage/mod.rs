//! Object storage backends.
//!
//! The ObjectStore trait hides where the CSV lands (S3 or the local filesystem)
//! so the publisher can be exercised against an in-memory store in tests.

pub mod local;
pub mod location;
pub mod s3;

pub use local::LocalStore;
pub use location::ObjectLocation;
pub use s3::S3Store;

use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported storage address '{0}' (expected s3:// or file://)")]
    UnsupportedScheme(String),

    #[error("no bucket in storage address '{0}'")]
    MissingBucket(String),

    #[error("no path in storage address '{0}'")]
    MissingPath(String),

    #[error("no object key in storage address '{0}'")]
    MissingKey(String),

    #[error("{backend} store cannot write to {location}")]
    WrongBackend { backend: String, location: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("S3 error: {0}")]
    S3(String),

    #[error("async runtime error: {0}")]
    Runtime(String),
}

/// Bytes to store plus the headers that travel with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// blake3 hex digest of `bytes`.
    pub digest: String,
}

impl ObjectBody {
    pub fn csv(bytes: Vec<u8>) -> Self {
        let digest = blake3::hash(&bytes).to_hex().to_string();
        Self {
            bytes,
            content_type: "text/csv".to_string(),
            digest,
        }
    }
}

/// A write-only object store. Objects are created, never updated or deleted.
pub trait ObjectStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Write `body` at `location` in a single operation.
    fn put(&self, location: &ObjectLocation, body: &ObjectBody) -> Result<(), StorageError>;
}

/// Pick the backend for an address's scheme.
pub fn store_for(location: &ObjectLocation) -> Result<Box<dyn ObjectStore>, StorageError> {
    match location {
        ObjectLocation::S3 { .. } => Ok(Box::new(S3Store::from_env()?)),
        ObjectLocation::Local { .. } => Ok(Box::new(LocalStore::new())),
    }
}
