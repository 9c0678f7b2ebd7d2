//! Job pipeline: primary fetch -> secondary fetch -> reconcile -> publish.
//!
//! Strictly sequential. Any failure aborts the run; nothing is written before
//! the final step, so there is nothing to clean up.

use crate::config::{JobConfig, RunClock};
use crate::data::{reconcile, DataError, DataProvider, DataSource};
use crate::domain::DailyBar;
use crate::publish::{Publication, PublishError, Publisher};
use crate::storage::ObjectStore;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, info_span};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{provider} fetch failed")]
    Fetch {
        provider: DataSource,
        #[source]
        source: DataError,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// How a run ended when nothing failed.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The merged row was written.
    Published(Publication),
    /// The providers disagree on the latest day; nothing was written.
    DatesOutOfSync {
        primary: NaiveDate,
        secondary: NaiveDate,
    },
}

fn fetch(
    provider: &dyn DataProvider,
    symbol: &str,
    target_date: NaiveDate,
) -> Result<DailyBar, JobError> {
    provider
        .fetch_latest(symbol, target_date)
        .map_err(|source| JobError::Fetch {
            provider: provider.source(),
            source,
        })
}

/// Run the job once.
pub fn run_job(
    config: &JobConfig,
    clock: &RunClock,
    primary: &dyn DataProvider,
    secondary: &dyn DataProvider,
    store: &dyn ObjectStore,
) -> Result<RunOutcome, JobError> {
    let _span = info_span!("run", ticker = config.ticker(), exec_time = %clock.exec_time).entered();
    info!(target_date = %clock.yday_date, "starting daily bar run");

    let primary_bar = fetch(primary, config.ticker(), clock.yday_date)?;
    let secondary_bar = fetch(secondary, config.ticker(), clock.yday_date)?;

    let Some(merged) = reconcile(&primary_bar, &secondary_bar) else {
        return Ok(RunOutcome::DatesOutOfSync {
            primary: primary_bar.date,
            secondary: secondary_bar.date,
        });
    };

    let publication = Publisher::new(store).put(
        config.ticker(),
        &merged,
        config.storage_uri(),
        config.key_prefix(),
        &clock.exec_time,
    )?;

    Ok(RunOutcome::Published(publication))
}
