// src/portfolio/history.rs
//! Reduction of snapshot collections to a monthly history.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};

use super::PortfolioSnapshot;

/// Calendar month a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Month of the given timestamp.
    pub fn from_timestamp(timestamp: DateTime<Utc>) -> Self {
        let date = timestamp.date_naive();
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Keeps the latest snapshot of each calendar month.
///
/// Fails when any snapshot's timestamp cannot be determined, leaving the
/// input unreduced rather than silently dropping records.
pub fn reduce_monthly(
    snapshots: Vec<PortfolioSnapshot>,
) -> Result<HashMap<MonthKey, PortfolioSnapshot>> {
    let mut latest: HashMap<MonthKey, (DateTime<Utc>, PortfolioSnapshot)> = HashMap::new();

    for snapshot in snapshots {
        let timestamp = snapshot.timestamp()?;
        let key = MonthKey::from_timestamp(timestamp);

        match latest.get(&key) {
            // Equal timestamps resolve to the record seen last.
            Some((best, _)) if *best > timestamp => {}
            _ => {
                latest.insert(key, (timestamp, snapshot));
            }
        }
    }

    Ok(latest
        .into_iter()
        .map(|(key, (_, snapshot))| (key, snapshot))
        .collect())
}

/// Sorts snapshots by generation time, oldest first.
///
/// The sort is stable, so snapshots sharing a timestamp keep their
/// relative input order.
pub fn sort_chronological(snapshots: Vec<PortfolioSnapshot>) -> Result<Vec<PortfolioSnapshot>> {
    let mut keyed = snapshots
        .into_iter()
        .map(|snapshot| -> Result<(DateTime<Utc>, PortfolioSnapshot)> {
            Ok((snapshot.timestamp()?, snapshot))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by_key(|(timestamp, _)| *timestamp);

    Ok(keyed.into_iter().map(|(_, snapshot)| snapshot).collect())
}
