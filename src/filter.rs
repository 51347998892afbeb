//! Row selection driven by the report's date, traffic and city choices.

use crate::types::CleanRecord;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const TRAFFIC_LEVELS: [&str; 4] = ["Low", "Medium", "High", "Jam"];
/// Traffic levels preselected when no choice is made. `Jam` is opt-in.
pub const DEFAULT_TRAFFIC: [&str; 3] = ["Low", "Medium", "High"];
/// City categories as spelled in the dataset.
pub const CITIES: [&str; 3] = ["Metropolitian", "Semi-Urban", "Urban"];

pub fn earliest_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 2, 11).unwrap_or_default()
}

pub fn latest_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 5, 6).unwrap_or_default()
}

pub fn default_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 4, 13).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Inclusive upper bound on the order date.
    pub cutoff_date: NaiveDate,
    pub allowed_traffic: BTreeSet<String>,
    pub allowed_cities: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_date: default_cutoff(),
            allowed_traffic: DEFAULT_TRAFFIC.iter().map(|s| s.to_string()).collect(),
            allowed_cities: CITIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilterConfig {
    pub fn new<T, C>(cutoff_date: NaiveDate, traffic: T, cities: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            cutoff_date,
            allowed_traffic: traffic.into_iter().map(Into::into).collect(),
            allowed_cities: cities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, r: &CleanRecord) -> bool {
        r.order_date <= self.cutoff_date
            && self.allowed_traffic.contains(&r.road_traffic_density)
            && self.allowed_cities.contains(&r.city)
    }
}

/// Keep the rows matching `config`, in input order.
pub fn apply(data: &[CleanRecord], config: FilterConfig) -> Vec<CleanRecord> {
    if config.cutoff_date < earliest_cutoff() || config.cutoff_date > latest_cutoff() {
        warn!(
            cutoff = %config.cutoff_date,
            "Cutoff date is outside the dataset range {}..={}",
            earliest_cutoff(),
            latest_cutoff()
        );
    }
    let out: Vec<CleanRecord> = data.iter().filter(|r| config.matches(r)).cloned().collect();
    debug!(input = data.len(), output = out.len(), "Applied filter");
    out
}
