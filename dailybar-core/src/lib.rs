//! dailybar core: fetch one ticker's latest daily bar from two providers,
//! reconcile them on date, and publish the merged row as CSV.
//!
//! This crate contains:
//! - Domain types (single-provider bar, merged two-source row)
//! - Yahoo Finance and Alpha Vantage providers behind one trait
//! - Date-matched reconciliation
//! - CSV publishing to S3 or the local filesystem
//! - Validated job configuration and the sequential pipeline

pub mod config;
pub mod data;
pub mod domain;
pub mod pipeline;
pub mod publish;
pub mod storage;

pub use config::{ConfigError, JobConfig, RunClock};
pub use data::{AlphaVantageProvider, DataError, DataProvider, DataSource, YahooProvider};
pub use domain::{DailyBar, MergedRecord};
pub use pipeline::{run_job, JobError, RunOutcome};
pub use publish::{Publication, PublishError, Publisher};
pub use storage::{ObjectBody, ObjectLocation, ObjectStore, StorageError};
