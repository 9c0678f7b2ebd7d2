//! Two-source reconciliation.
//!
//! The primary and secondary bars are joined on `Date` only when both providers
//! report the same day. A mismatch is not an error: one provider has simply not
//! published yesterday's bar yet, and the job is re-run later.

use crate::domain::{DailyBar, MergedRecord};
use tracing::{info, warn};

/// Join the primary and secondary bars on `Date`.
///
/// Returns `None` when the dates differ. Values from both sides are carried
/// over unchanged.
pub fn reconcile(primary: &DailyBar, secondary: &DailyBar) -> Option<MergedRecord> {
    if primary.date != secondary.date {
        warn!(
            primary_date = %primary.date,
            secondary_date = %secondary.date,
            "Table dates are not yet in sync. Re-run script in 1 hour."
        );
        return None;
    }

    info!(date = %primary.date, "merged primary and secondary bars");
    Some(MergedRecord::join(primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(date: &str, open: f64, volume: u64) -> DailyBar {
        DailyBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open,
            high: open + 5.0,
            low: open - 1.0,
            close: open + 2.0,
            volume,
        }
    }

    #[test]
    fn same_date_merges_both_sides() {
        let yf = bar("2024-03-04", 100.0, 1000);
        let av = bar("2024-03-04", 101.0, 1100);

        let merged = reconcile(&yf, &av).unwrap();
        assert_eq!(merged.date, yf.date);
        assert_eq!(
            (merged.open_yf, merged.high_yf, merged.low_yf, merged.close_yf, merged.volume_yf),
            (100.0, 105.0, 99.0, 102.0, 1000)
        );
        assert_eq!(
            (merged.open_av, merged.high_av, merged.low_av, merged.close_av, merged.volume_av),
            (101.0, 106.0, 100.0, 103.0, 1100)
        );
    }

    #[test]
    fn stale_secondary_returns_none() {
        let yf = bar("2024-03-04", 100.0, 1000);
        let av = bar("2024-03-01", 101.0, 1100);
        assert!(reconcile(&yf, &av).is_none());
    }

    #[test]
    fn join_is_asymmetric() {
        let yf = bar("2024-03-04", 100.0, 1000);
        let av = bar("2024-03-04", 101.0, 1100);

        let forward = reconcile(&yf, &av).unwrap();
        let backward = reconcile(&av, &yf).unwrap();
        assert_eq!(forward.open_yf, 100.0);
        assert_eq!(backward.open_yf, 101.0);
        assert_ne!(forward, backward);
    }
}
