//! Fakes shared by the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use dailybar_core::storage::{ObjectBody, ObjectLocation, ObjectStore, StorageError};
use dailybar_core::{DailyBar, DataError, DataProvider, DataSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn bar(day: &str, open: f64, high: f64, low: f64, close: f64, volume: u64) -> DailyBar {
    DailyBar {
        date: date(day),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Provider that returns a canned bar (or error) and counts calls.
pub struct FakeProvider {
    source: DataSource,
    response: Mutex<Option<Result<DailyBar, DataError>>>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn returning(source: DataSource, bar: DailyBar) -> Self {
        Self {
            source,
            response: Mutex::new(Some(Ok(bar))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(source: DataSource, err: DataError) -> Self {
        Self {
            source,
            response: Mutex::new(Some(Err(err))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DataProvider for FakeProvider {
    fn source(&self) -> DataSource {
        self.source
    }

    fn fetch_latest(&self, _symbol: &str, _target_date: NaiveDate) -> Result<DailyBar, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .unwrap()
            .take()
            .expect("fake provider called more than once")
    }
}

/// Store that keeps every put in memory, optionally failing all writes.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<Vec<(ObjectLocation, ObjectBody)>>,
    pub fail_with: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn put_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

impl ObjectStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn put(&self, location: &ObjectLocation, body: &ObjectBody) -> Result<(), StorageError> {
        if let Some(message) = &self.fail_with {
            return Err(StorageError::S3(message.clone()));
        }
        self.objects
            .lock()
            .unwrap()
            .push((location.clone(), body.clone()));
        Ok(())
    }
}
