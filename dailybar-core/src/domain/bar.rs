//! DailyBar: one provider's view of a single trading day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for one symbol on one day, as reported by a single provider.
///
/// Prices are carried exactly as the provider returned them; nothing here
/// checks that high >= low or that volume is plausible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}
