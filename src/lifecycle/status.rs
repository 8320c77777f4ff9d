//! Permit lifecycle classification
//!
//! A facility is `valid`, `expiring` (expiry falls within the horizon) or
//! `expired` relative to a given day.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::date::ParsedDate;

/// Default forward window for flagging permits as expiring
pub const EXPIRY_HORIZON_DAYS: u32 = 90;

/// Permit status of a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    Valid,
    Expiring,
    Expired,
}

impl LifecycleStatus {
    pub const ALL: [LifecycleStatus; 3] = [Self::Valid, Self::Expiring, Self::Expired];
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Expiring => write!(f, "expiring"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for LifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "valid" | "active" => Ok(Self::Valid),
            "expiring" => Ok(Self::Expiring),
            "expired" => Ok(Self::Expired),
            other => Err(format!(
                "Unknown status '{}' (expected valid, expiring or expired)",
                other
            )),
        }
    }
}

/// Status assigned when an expiry date was recorded but cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnparseablePolicy {
    /// Fail closed
    #[default]
    Expired,
    /// Fail open
    Valid,
}

impl UnparseablePolicy {
    pub fn status(self) -> LifecycleStatus {
        match self {
            Self::Expired => LifecycleStatus::Expired,
            Self::Valid => LifecycleStatus::Valid,
        }
    }
}

impl fmt::Display for UnparseablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.status().fmt(f)
    }
}

impl FromStr for UnparseablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expired" => Ok(Self::Expired),
            "valid" => Ok(Self::Valid),
            other => Err(format!(
                "Unknown policy '{}' (expected expired or valid)",
                other
            )),
        }
    }
}

/// Classification rules: horizon length and the unreadable-date fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub horizon_days: u32,
    pub unparseable: UnparseablePolicy,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            horizon_days: EXPIRY_HORIZON_DAYS,
            unparseable: UnparseablePolicy::default(),
        }
    }
}

impl LifecyclePolicy {
    pub fn new(horizon_days: u32, unparseable: UnparseablePolicy) -> Self {
        Self {
            horizon_days,
            unparseable,
        }
    }

    /// Last day (inclusive) that still counts as expiring
    pub fn horizon(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.horizon_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Classify an expiry date relative to `today`
    ///
    /// First match wins: no date is valid, an unreadable date follows the
    /// policy, on or before today is expired, on or before the horizon is
    /// expiring, anything later is valid.
    pub fn classify(&self, today: NaiveDate, expiry: &ParsedDate) -> LifecycleStatus {
        match *expiry {
            ParsedDate::Missing => LifecycleStatus::Valid,
            ParsedDate::Unparseable => self.unparseable.status(),
            ParsedDate::Date(date) if date <= today => LifecycleStatus::Expired,
            ParsedDate::Date(date) if date <= self.horizon(today) => LifecycleStatus::Expiring,
            ParsedDate::Date(_) => LifecycleStatus::Valid,
        }
    }
}

/// Classify with the default 90-day horizon and fail-closed fallback
pub fn classify_lifecycle(today: NaiveDate, expiry: &ParsedDate) -> LifecycleStatus {
    LifecyclePolicy::default().classify(today, expiry)
}

/// Signed number of days from `today` until `expiry`
pub fn days_until(today: NaiveDate, expiry: &ParsedDate) -> Option<i64> {
    expiry
        .date()
        .map(|date| date.signed_duration_since(today).num_days())
}
