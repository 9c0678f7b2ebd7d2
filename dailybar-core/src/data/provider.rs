//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over the two upstream sources (Yahoo Finance
//! and Alpha Vantage) so the pipeline can be driven by fakes in tests.

use crate::domain::DailyBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Request timeout shared by both providers.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Structured error types for fetch operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to construct HTTP client: {0}")]
    ClientBuild(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {provider} for {symbol}")]
    Http {
        provider: DataSource,
        symbol: String,
        status: u16,
    },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("{provider} rejected the request: {message}")]
    ProviderRejected {
        provider: DataSource,
        message: String,
    },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },
}

/// Where a bar came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    AlphaVantage,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::YahooFinance => f.write_str("yahoo_finance"),
            DataSource::AlphaVantage => f.write_str("alpha_vantage"),
        }
    }
}

/// A source of daily bars.
///
/// Each call issues exactly one request. There is no retry, no cache and no
/// fallback; errors go straight back to the caller.
pub trait DataProvider: Send + Sync {
    /// Which upstream this provider talks to.
    fn source(&self) -> DataSource;

    /// Fetch the most recent available daily bar for `symbol`.
    ///
    /// `target_date` is the day the caller expects (normally yesterday). It
    /// never filters the result; providers may only use it for diagnostics.
    fn fetch_latest(&self, symbol: &str, target_date: NaiveDate) -> Result<DailyBar, DataError>;
}

/// Blocking HTTP client shared by both providers.
pub(crate) fn http_client() -> Result<reqwest::blocking::Client, DataError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .map_err(|e| DataError::ClientBuild(e.to_string()))
}

/// Parse a numeric field the provider sends as text.
pub(crate) fn parse_field<T: std::str::FromStr>(
    symbol: &str,
    field: &str,
    raw: &str,
) -> Result<T, DataError>
where
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        DataError::ResponseFormatChanged(format!("{symbol}: bad {field} value '{raw}': {e}"))
    })
}
