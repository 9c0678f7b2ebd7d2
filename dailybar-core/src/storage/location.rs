//! Object addresses: `s3://bucket/key` or `file:///path`.

use super::StorageError;
use std::fmt;
use std::path::PathBuf;

const S3_SCHEME: &str = "s3://";
const FILE_SCHEME: &str = "file://";

/// A parsed destination address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectLocation {
    /// An S3 bucket plus object key. The key may be empty for a bare bucket base.
    S3 { bucket: String, key: String },
    /// A path on the local filesystem.
    Local { path: PathBuf },
}

impl ObjectLocation {
    /// Parse an address. Only the `s3://` and `file://` schemes are accepted.
    pub fn parse(address: &str) -> Result<Self, StorageError> {
        if let Some(rest) = address.strip_prefix(S3_SCHEME) {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() {
                return Err(StorageError::MissingBucket(address.to_string()));
            }
            return Ok(ObjectLocation::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        if let Some(path) = address.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(StorageError::MissingPath(address.to_string()));
            }
            return Ok(ObjectLocation::Local {
                path: PathBuf::from(path),
            });
        }

        Err(StorageError::UnsupportedScheme(address.to_string()))
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectLocation::S3 { bucket, key } => write!(f, "{S3_SCHEME}{bucket}/{key}"),
            ObjectLocation::Local { path } => write!(f, "{FILE_SCHEME}{}", path.display()),
        }
    }
}
