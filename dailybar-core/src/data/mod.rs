//! Data providers and two-source reconciliation

pub mod alpha_vantage;
pub mod provider;
pub mod reconcile;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod stub_http;

pub use alpha_vantage::AlphaVantageProvider;
pub use provider::{DataError, DataProvider, DataSource};
pub use reconcile::reconcile;
pub use yahoo::YahooProvider;
