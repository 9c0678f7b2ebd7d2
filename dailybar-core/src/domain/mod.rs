//! Domain types: a provider's daily bar and the reconciled two-source row.

pub mod bar;
pub mod record;

pub use bar::DailyBar;
pub use record::{MergedRecord, MERGED_COLUMNS};
