//! Alpha Vantage data provider (secondary source).
//!
//! One GET to the `TIME_SERIES_DAILY` endpoint per call. The response nests a
//! per-day object under `"Time Series (Daily)"`; only the newest day is kept.
//!
//! Alpha Vantage answers throttled or invalid requests with HTTP 200 and a
//! `Note` / `Information` / `Error Message` body instead of the series.

use super::provider::{http_client, parse_field, DataError, DataProvider, DataSource};
use crate::domain::DailyBar;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

const BASE_URL: &str = "https://www.alphavantage.co";

/// TIME_SERIES_DAILY response. Keys are `YYYY-MM-DD`, so map order is date order.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyQuote>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyQuote {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Alpha Vantage data provider.
pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, DataError> {
        let client = http_client()
            .inspect_err(|e| error!(error = %e, "Unable to complete GET request."))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    fn query_url(&self, symbol: &str) -> Result<Url, DataError> {
        Url::parse_with_params(
            &format!("{}/query", self.base_url.trim_end_matches('/')),
            &[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| DataError::ClientBuild(format!("bad base URL '{}': {e}", self.base_url)))
    }
}

/// Parse a TIME_SERIES_DAILY body and keep only the newest day.
pub(crate) fn parse_time_series(symbol: &str, body: &str) -> Result<DailyBar, DataError> {
    let resp: TimeSeriesResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
    })?;

    let series = match resp.time_series {
        Some(series) => series,
        None => {
            return Err(match resp.error_message.or(resp.note).or(resp.information) {
                Some(message) => DataError::ProviderRejected {
                    provider: DataSource::AlphaVantage,
                    message,
                },
                None => DataError::ResponseFormatChanged(format!(
                    "no \"Time Series (Daily)\" in response for {symbol}"
                )),
            });
        }
    };

    let (day, quote) = series.into_iter().next_back().ok_or_else(|| {
        DataError::ResponseFormatChanged(format!("empty time series for {symbol}"))
    })?;

    let date = NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|e| {
        DataError::ResponseFormatChanged(format!("{symbol}: bad date key '{day}': {e}"))
    })?;

    Ok(DailyBar {
        date,
        open: parse_field(symbol, "open", &quote.open)?,
        high: parse_field(symbol, "high", &quote.high)?,
        low: parse_field(symbol, "low", &quote.low)?,
        close: parse_field(symbol, "close", &quote.close)?,
        volume: parse_field(symbol, "volume", &quote.volume)?,
    })
}

impl DataProvider for AlphaVantageProvider {
    fn source(&self) -> DataSource {
        DataSource::AlphaVantage
    }

    fn fetch_latest(&self, symbol: &str, target_date: NaiveDate) -> Result<DailyBar, DataError> {
        // The URL carries the API key, so it is never logged
        let url = self.query_url(symbol)?;
        debug!(symbol, "requesting TIME_SERIES_DAILY");

        let resp = self.client.get(url).send().map_err(|e| {
            let e = e.without_url();
            error!(symbol, error = %e, "Unable to complete GET request.");
            DataError::NetworkUnreachable(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            error!(symbol, %status, "Unable to complete GET request.");
            return Err(DataError::Http {
                provider: DataSource::AlphaVantage,
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|e| {
            let e = e.without_url();
            error!(symbol, error = %e, "Unable to complete GET request.");
            DataError::NetworkUnreachable(e.to_string())
        })?;

        let bar = parse_time_series(symbol, &body)
            .inspect_err(|e| error!(symbol, error = %e, "Unable to parse Alpha Vantage response."))?;

        if bar.date != target_date {
            debug!(symbol, latest = %bar.date, expected = %target_date, "latest Alpha Vantage day is not the target date");
        }
        info!(symbol, date = %bar.date, close = bar.close, "fetched latest Alpha Vantage bar");
        Ok(bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "NVDA",
            "3. Last Refreshed": "2024-03-04"
        },
        "Time Series (Daily)": {
            "2024-03-01": {
                "1. open": "95.5000",
                "2. high": "97.0000",
                "3. low": "94.0000",
                "4. close": "96.0000",
                "5. volume": "900"
            },
            "2024-03-04": {
                "1. open": "101.0000",
                "2. high": "106.0000",
                "3. low": "98.0000",
                "4. close": "103.0000",
                "5. volume": "1100"
            }
        }
    }"#;

    #[test]
    fn keeps_newest_day_regardless_of_key_order() {
        let bar = parse_time_series("NVDA", DAILY_BODY).unwrap();
        assert_eq!(bar.date.to_string(), "2024-03-04");
        assert_eq!(bar.open, 101.0);
        assert_eq!(bar.high, 106.0);
        assert_eq!(bar.low, 98.0);
        assert_eq!(bar.close, 103.0);
        assert_eq!(bar.volume, 1100);
    }

    #[test]
    fn rate_limit_note_is_provider_rejection() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let err = parse_time_series("NVDA", body).unwrap_err();
        match err {
            DataError::ProviderRejected { provider, message } => {
                assert_eq!(provider, DataSource::AlphaVantage);
                assert!(message.contains("call frequency"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_symbol_error_message_is_provider_rejection() {
        let body = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#;
        let err = parse_time_series("ZZZZ", body).unwrap_err();
        assert!(matches!(err, DataError::ProviderRejected { .. }));
    }

    #[test]
    fn missing_series_without_message_is_format_error() {
        let err = parse_time_series("NVDA", "{}").unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn empty_series_is_format_error() {
        let err = parse_time_series("NVDA", r#"{"Time Series (Daily)": {}}"#).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn non_numeric_volume_is_format_error() {
        let body = r#"{"Time Series (Daily)": {"2024-03-04": {
            "1. open": "1", "2. high": "1", "3. low": "1", "4. close": "1", "5. volume": "lots"}}}"#;
        let err = parse_time_series("NVDA", body).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn query_url_carries_function_symbol_and_key() {
        let provider = AlphaVantageProvider::with_base_url("demo", "https://example.test/").unwrap();
        let url = provider.query_url("NVDA").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/query?function=TIME_SERIES_DAILY&symbol=NVDA&apikey=demo"
        );
    }

    // ── fetch_latest over HTTP ───────────────────────────────────────

    use crate::data::stub_http::{self, StubServer};

    fn provider_at(base_url: &str) -> AlphaVantageProvider {
        let mut provider = AlphaVantageProvider::with_base_url("secret-key", base_url).unwrap();
        provider.client = stub_http::client();
        provider
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn fetch_queries_daily_series_and_keeps_newest_day() {
        let server = StubServer::reply("200 OK", DAILY_BODY);
        let bar = provider_at(&server.base_url).fetch_latest("NVDA", day(4)).unwrap();

        assert_eq!(bar.date, day(4));
        assert_eq!(bar.close, 103.0);
        assert_eq!(
            server.request_line(),
            "GET /query?function=TIME_SERIES_DAILY&symbol=NVDA&apikey=secret-key HTTP/1.1"
        );
    }

    #[test]
    fn fetch_does_not_filter_by_target_date() {
        let server = StubServer::reply("200 OK", DAILY_BODY);
        let bar = provider_at(&server.base_url).fetch_latest("NVDA", day(5)).unwrap();
        assert_eq!(bar.date, day(4));
    }

    #[test]
    fn fetch_surfaces_rate_limit_note_sent_with_200() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let server = StubServer::reply("200 OK", body);
        let err = provider_at(&server.base_url)
            .fetch_latest("NVDA", day(4))
            .unwrap_err();

        assert!(matches!(
            err,
            DataError::ProviderRejected {
                provider: DataSource::AlphaVantage,
                ..
            }
        ));
    }

    #[test]
    fn fetch_maps_server_error_to_http_status() {
        let server = StubServer::reply("500 Internal Server Error", DAILY_BODY);
        let err = provider_at(&server.base_url)
            .fetch_latest("NVDA", day(4))
            .unwrap_err();

        match err {
            DataError::Http {
                provider,
                symbol,
                status,
            } => {
                assert_eq!(provider, DataSource::AlphaVantage);
                assert_eq!(symbol, "NVDA");
                assert_eq!(status, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fetch_maps_refused_connection_without_leaking_key() {
        let err = provider_at(&stub_http::refused_base_url())
            .fetch_latest("NVDA", day(4))
            .unwrap_err();

        assert!(matches!(err, DataError::NetworkUnreachable(_)));
        assert!(!err.to_string().contains("secret-key"));
    }
}
