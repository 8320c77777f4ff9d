//! Facility lifecycle classification
//!
//! Pure functions that turn recorded date values into calendar dates and
//! classify permits as valid, expiring or expired.
//!
//! - `date`: date parsing, spreadsheet serial dates, export formatting
//! - `status`: the classifier and its policy
//! - `stats`: status tallies for dashboards

pub mod date;
pub mod stats;
pub mod status;

pub use date::{
    from_serial, normalize_date_cell, parse_date, parse_date_with, serialize_date_for_export,
    DateInput, DateOrder, ParsedDate,
};
pub use stats::{LifecycleTally, SectorBreakdown, StatusCounts};
pub use status::{
    classify_lifecycle, days_until, LifecyclePolicy, LifecycleStatus, UnparseablePolicy,
    EXPIRY_HORIZON_DAYS,
};
