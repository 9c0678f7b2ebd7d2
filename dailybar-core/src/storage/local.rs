//! Filesystem-backed object store for `file://` destinations.
//!
//! Writes are atomic: the body goes to a `.tmp` sibling which is then renamed
//! into place, so a reader never sees a half-written CSV.

use super::{ObjectBody, ObjectLocation, ObjectStore, StorageError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Local filesystem store.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl ObjectStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    fn put(&self, location: &ObjectLocation, body: &ObjectBody) -> Result<(), StorageError> {
        let path = match location {
            ObjectLocation::Local { path } => path,
            other => {
                return Err(StorageError::WrongBackend {
                    backend: self.name().to_string(),
                    location: other.to_string(),
                })
            }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        fs::write(tmp_path, &body.bytes).map_err(|e| io_error(tmp_path, e))?;
        fs::rename(tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(tmp_path);
            io_error(path, e)
        })?;

        debug!(path = %path.display(), bytes = body.bytes.len(), "wrote local object");
        Ok(())
    }
}
