//! Status tallies for dashboards
//!
//! Counts of each lifecycle status, overall and per sector. Sectors are
//! grouped by their upper-cased label so spelling-case variants share a row.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::Serialize;

use super::status::LifecycleStatus;
use crate::normalize::sector_label;

/// Number of facilities in each status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub valid: usize,
    pub expiring: usize,
    pub expired: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: LifecycleStatus) {
        match status {
            LifecycleStatus::Valid => self.valid += 1,
            LifecycleStatus::Expiring => self.expiring += 1,
            LifecycleStatus::Expired => self.expired += 1,
        }
    }

    pub fn get(&self, status: LifecycleStatus) -> usize {
        match status {
            LifecycleStatus::Valid => self.valid,
            LifecycleStatus::Expiring => self.expiring,
            LifecycleStatus::Expired => self.expired,
        }
    }

    pub fn total(&self) -> usize {
        self.valid + self.expiring + self.expired
    }
}

impl Add for StatusCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            valid: self.valid + other.valid,
            expiring: self.expiring + other.expiring,
            expired: self.expired + other.expired,
        }
    }
}

impl AddAssign for StatusCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::iter::Sum for StatusCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(StatusCounts::default(), |acc, c| acc + c)
    }
}

/// Status counts keyed by sector label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectorBreakdown {
    sectors: BTreeMap<String, StatusCounts>,
}

impl SectorBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sector: Option<&str>, status: LifecycleStatus) {
        self.sectors
            .entry(sector_label(sector))
            .or_default()
            .record(status);
    }

    /// Counts for a sector; the label is matched case-insensitively
    pub fn get(&self, sector: &str) -> Option<&StatusCounts> {
        self.sectors.get(&sector_label(Some(sector)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusCounts)> {
        self.sectors.iter().map(|(label, counts)| (label.as_str(), counts))
    }

    /// Sum over every sector
    pub fn totals(&self) -> StatusCounts {
        self.sectors.values().copied().sum()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Overall and per-sector counts accumulated together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LifecycleTally {
    pub totals: StatusCounts,
    pub sectors: SectorBreakdown,
}

impl LifecycleTally {
    pub fn record(&mut self, sector: Option<&str>, status: LifecycleStatus) {
        self.totals.record(status);
        self.sectors.record(sector, status);
    }
}

impl<'a> FromIterator<(Option<&'a str>, LifecycleStatus)> for LifecycleTally {
    fn from_iter<I: IntoIterator<Item = (Option<&'a str>, LifecycleStatus)>>(iter: I) -> Self {
        let mut tally = Self::default();
        for (sector, status) in iter {
            tally.record(sector, status);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{classify_lifecycle, parse_date};
    use chrono::NaiveDate;

    #[test]
    fn test_counts_record_and_total() {
        let mut counts = StatusCounts::default();
        counts.record(LifecycleStatus::Valid);
        counts.record(LifecycleStatus::Expired);
        counts.record(LifecycleStatus::Expired);

        assert_eq!(counts.get(LifecycleStatus::Expired), 2);
        assert_eq!(counts.get(LifecycleStatus::Expiring), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_sector_case_variants_share_a_row() {
        let mut breakdown = SectorBreakdown::new();
        breakdown.record(Some("Mining"), LifecycleStatus::Valid);
        breakdown.record(Some(" MINING"), LifecycleStatus::Expired);
        breakdown.record(Some("mining"), LifecycleStatus::Expiring);

        assert_eq!(breakdown.len(), 1);
        let mining = breakdown.get("mining").unwrap();
        assert_eq!(mining.total(), 3);
    }

    #[test]
    fn test_blank_sector_is_unknown() {
        let mut breakdown = SectorBreakdown::new();
        breakdown.record(None, LifecycleStatus::Valid);
        breakdown.record(Some("  "), LifecycleStatus::Valid);

        assert_eq!(breakdown.get("unknown").unwrap().valid, 2);
    }

    #[test]
    fn test_sector_sums_match_ungrouped_totals() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let facilities = [
            (Some("Mining"), "01/01/2025"),
            (Some("HEALTH"), "20/07/2025"),
            (Some("health"), "01/01/2030"),
            (None, ""),
            (Some("Tourism"), "not a date"),
            (Some("Mining"), "15/06/2025"),
            (Some("Energy"), "13/09/2025"),
        ];

        let tally: LifecycleTally = facilities
            .iter()
            .map(|(sector, expiry)| (*sector, classify_lifecycle(today, &parse_date(*expiry))))
            .collect();

        assert_eq!(tally.totals.total(), facilities.len());
        assert_eq!(tally.sectors.totals(), tally.totals);
        assert_eq!(tally.totals.expired, 3);
        assert_eq!(tally.totals.expiring, 2);
        assert_eq!(tally.totals.valid, 2);

        let per_sector: usize = tally.sectors.iter().map(|(_, c)| c.total()).sum();
        assert_eq!(per_sector, facilities.len());
    }
}
