//! Yahoo Finance data provider (primary source).
//!
//! Fetches a short daily history from Yahoo's v8 chart API and reduces it to the
//! most recent trading day. Dates are taken in the exchange's local time using
//! the `gmtoffset` reported in the chart metadata.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{http_client, DataError, DataProvider, DataSource};
use crate::domain::DailyBar;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error, info};

const BASE_URL: &str = "https://query2.finance.yahoo.com";

/// History window requested per call. Wide enough to span a long weekend.
const HISTORY_RANGE: &str = "5d";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different host (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = http_client()
            .inspect_err(|e| error!(error = %e, "Unable to extract ticker data."))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build the chart API URL for a symbol.
    fn chart_url(&self, symbol: &str) -> Result<Url, DataError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DataError::ClientBuild(format!("bad base URL '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| DataError::ClientBuild(format!("base URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", HISTORY_RANGE)
            .append_pair("interval", "1d");
        Ok(url)
    }
}

/// Parse a chart API body and keep only the most recent trading day.
pub(crate) fn parse_chart(symbol: &str, body: &str) -> Result<DailyBar, DataError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
    })?;
    let bars = parse_response(symbol, resp)?;
    bars.into_iter()
        .max_by_key(|b| b.date)
        .ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })
}

/// Parse the chart API response into bars, skipping days with no data at all.
fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<DailyBar>, DataError> {
    let result = resp.chart.result.ok_or_else(|| {
        if let Some(err) = resp.chart.error {
            if err.code == "Not Found" {
                DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }
            } else {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
        } else {
            DataError::ResponseFormatChanged("empty result with no error".into())
        }
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    let gmtoffset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

    let timestamps = data
        .timestamp
        .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts + gmtoffset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Holidays and the not-yet-open current session come back all-null
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none() {
            continue;
        }

        bars.push(DailyBar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        });
    }

    Ok(bars)
}

impl DataProvider for YahooProvider {
    fn source(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn fetch_latest(&self, symbol: &str, _target_date: NaiveDate) -> Result<DailyBar, DataError> {
        let url = self.chart_url(symbol)?;
        debug!(symbol, %url, "requesting daily history");

        let resp = self.client.get(url).send().map_err(|e| {
            error!(symbol, error = %e, "Unable to extract ticker data.");
            DataError::NetworkUnreachable(e.to_string())
        })?;

        let status = resp.status();
        // A 404 still carries the chart error body, which names the missing symbol
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            error!(symbol, %status, "Unable to extract ticker data.");
            return Err(DataError::Http {
                provider: DataSource::YahooFinance,
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|e| {
            error!(symbol, error = %e, "Unable to extract ticker data.");
            DataError::NetworkUnreachable(e.to_string())
        })?;

        let bar = parse_chart(symbol, &body)
            .inspect_err(|e| error!(symbol, error = %e, "Unable to extract ticker data."))?;
        info!(symbol, date = %bar.date, close = bar.close, "fetched latest Yahoo Finance bar");
        Ok(bar)
    }
}
