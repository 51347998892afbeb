//! Delivery-logistics report: load a delivery CSV, drop rows with missing
//! values, narrow it by date/traffic/city and compute the restaurant-view
//! metrics (courier count, distances, delivery times by city, order type,
//! traffic and festival).

pub mod cleaner;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use error::{Error, Result};
pub use filter::FilterConfig;
pub use types::{CleanRecord, RawRecord};
