//! MergedRecord: both providers' bars for the same day, side by side.

use super::bar::DailyBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Published column order. Yahoo Finance values carry `_yf`, Alpha Vantage `_av`.
pub const MERGED_COLUMNS: [&str; 11] = [
    "Date",
    "Open_yf",
    "High_yf",
    "Low_yf",
    "Close_yf",
    "Volume_yf",
    "Open_av",
    "High_av",
    "Low_av",
    "Close_av",
    "Volume_av",
];

/// Left join of the primary and secondary bars on `Date`.
///
/// Field order is the CSV column order; the serde renames are the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open_yf")]
    pub open_yf: f64,
    #[serde(rename = "High_yf")]
    pub high_yf: f64,
    #[serde(rename = "Low_yf")]
    pub low_yf: f64,
    #[serde(rename = "Close_yf")]
    pub close_yf: f64,
    #[serde(rename = "Volume_yf")]
    pub volume_yf: u64,
    #[serde(rename = "Open_av")]
    pub open_av: f64,
    #[serde(rename = "High_av")]
    pub high_av: f64,
    #[serde(rename = "Low_av")]
    pub low_av: f64,
    #[serde(rename = "Close_av")]
    pub close_av: f64,
    #[serde(rename = "Volume_av")]
    pub volume_av: u64,
}

impl MergedRecord {
    /// Join two bars without checking their dates. The primary bar supplies `Date`.
    pub(crate) fn join(primary: &DailyBar, secondary: &DailyBar) -> Self {
        Self {
            date: primary.date,
            open_yf: primary.open,
            high_yf: primary.high,
            low_yf: primary.low,
            close_yf: primary.close,
            volume_yf: primary.volume,
            open_av: secondary.open,
            high_av: secondary.high,
            low_av: secondary.low,
            close_av: secondary.close,
            volume_av: secondary.volume,
        }
    }
}
