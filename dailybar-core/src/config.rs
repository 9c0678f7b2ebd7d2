//! Job configuration, validated once at startup, and the run clock.

use crate::storage::{ObjectLocation, StorageError};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::fmt;
use thiserror::Error;

/// Format of the execution timestamp embedded in object names.
pub const EXEC_TIME_FORMAT: &str = "%Y-%m-%d_%H:%M";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("ticker '{0}' contains characters outside A-Z, a-z, 0-9, '.', '-', '^', '='")]
    InvalidTicker(String),

    #[error("Alpha Vantage API key must not be empty")]
    EmptyApiKey,

    #[error("invalid storage URI: {0}")]
    StorageUri(#[from] StorageError),

    #[error("storage URI '{0}' must end the bucket name with '/' (e.g. s3://bucket-name/)")]
    UnterminatedBucket(String),

    #[error("key prefix '{0}' must not start with '/'")]
    AbsoluteKeyPrefix(String),
}

/// Everything one run needs from the outside world.
///
/// Construct with [`JobConfig::new`]; every accessor returns an already
/// validated value.
#[derive(Clone)]
pub struct JobConfig {
    ticker: String,
    api_key: String,
    storage_uri: String,
    key_prefix: String,
}

impl JobConfig {
    pub fn new(
        ticker: impl Into<String>,
        api_key: impl Into<String>,
        storage_uri: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            ticker: ticker.into(),
            api_key: api_key.into(),
            storage_uri: storage_uri.into(),
            key_prefix: key_prefix.into(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker.is_empty() {
            return Err(ConfigError::EmptyTicker);
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=');
        if !self.ticker.chars().all(allowed) {
            return Err(ConfigError::InvalidTicker(self.ticker.clone()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        ObjectLocation::parse(&self.storage_uri)?;
        // Keys are appended verbatim, so `s3://bucket` + `daily/` would name another bucket
        if let Some(rest) = self.storage_uri.strip_prefix("s3://") {
            if !rest.contains('/') {
                return Err(ConfigError::UnterminatedBucket(self.storage_uri.clone()));
            }
        }
        if self.key_prefix.starts_with('/') {
            return Err(ConfigError::AbsoluteKeyPrefix(self.key_prefix.clone()));
        }
        Ok(())
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Storage address base, e.g. `s3://bucket-name/`.
    pub fn storage_uri(&self) -> &str {
        &self.storage_uri
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// The storage base parsed into a location. Validated in `new`.
    pub fn storage_location(&self) -> Result<ObjectLocation, ConfigError> {
        Ok(ObjectLocation::parse(&self.storage_uri)?)
    }
}

impl fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobConfig")
            .field("ticker", &self.ticker)
            .field("api_key", &"<redacted>")
            .field("storage_uri", &self.storage_uri)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

/// The two timestamps a run derives from the wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunClock {
    /// Calendar day before the run, the day both providers should report.
    pub yday_date: NaiveDate,
    /// `YYYY-MM-DD_HH:MM`, embedded in the object name.
    pub exec_time: String,
}

impl RunClock {
    /// Derive both values from a single reading of `now`.
    pub fn at<Tz: TimeZone>(now: DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            yday_date: now.date_naive() - chrono::Duration::days(1),
            exec_time: now.format(EXEC_TIME_FORMAT).to_string(),
        }
    }

    /// Local wall-clock time.
    pub fn now() -> Self {
        Self::at(Local::now())
    }
}
