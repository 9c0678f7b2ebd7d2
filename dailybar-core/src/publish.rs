//! Publisher: merged row -> CSV -> one new object in storage.
//!
//! Object key: `{key_prefix}{ticker}_stock_data{exec_time}.csv`.
//! Destination address: `{storage_uri}{key}`, both concatenated verbatim.

use crate::domain::{MergedRecord, MERGED_COLUMNS};
use crate::storage::{ObjectBody, ObjectLocation, ObjectStore, StorageError};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    CsvFlush(String),

    #[error("unable to write file to {destination}")]
    Storage {
        destination: String,
        #[source]
        source: StorageError,
    },
}

/// Receipt for a completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Full destination address, e.g. `s3://bucket/daily/NVDA_stock_data2024-03-04_09:15.csv`.
    pub destination: String,
    /// Object key including the prefix.
    pub key: String,
    pub bytes: usize,
    /// blake3 hex digest of the CSV payload.
    pub digest: String,
}

/// `{ticker}_stock_data{exec_time}.csv`
pub fn object_name(ticker: &str, exec_time: &str) -> String {
    format!("{ticker}_stock_data{exec_time}.csv")
}

/// Prefix plus object name, concatenated with no separator added.
pub fn object_key(key_prefix: &str, ticker: &str, exec_time: &str) -> String {
    format!("{key_prefix}{}", object_name(ticker, exec_time))
}

/// Header plus one data row, no index column.
pub fn to_csv(record: &MergedRecord) -> Result<Vec<u8>, PublishError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(MERGED_COLUMNS)?;
    wtr.serialize(record)?;
    wtr.into_inner()
        .map_err(|e| PublishError::CsvFlush(e.to_string()))
}

/// Writes merged rows to an object store.
pub struct Publisher<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> Publisher<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Serialize `record` and write it under a new, timestamped key.
    ///
    /// There is no existence check: an object already at the key is replaced.
    pub fn put(
        &self,
        ticker: &str,
        record: &MergedRecord,
        storage_uri: &str,
        key_prefix: &str,
        exec_time: &str,
    ) -> Result<Publication, PublishError> {
        let key = object_key(key_prefix, ticker, exec_time);
        let destination = format!("{storage_uri}{key}");

        info!(destination = %destination, store = self.store.name(), "Attempting to write data to storage destination.");

        let body = ObjectBody::csv(to_csv(record)?);
        let written = ObjectLocation::parse(&destination)
            .and_then(|location| self.store.put(&location, &body));

        if let Err(source) = written {
            error!(
                destination = %destination,
                store = self.store.name(),
                error = %source,
                "Unable to write file to storage location."
            );
            return Err(PublishError::Storage {
                destination,
                source,
            });
        }

        info!(
            destination = %destination,
            store = self.store.name(),
            bytes = body.bytes.len(),
            digest = %body.digest,
            "Successfully uploaded file."
        );

        Ok(Publication {
            destination,
            key,
            bytes: body.bytes.len(),
            digest: body.digest,
        })
    }
}
