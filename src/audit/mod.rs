//! Audit log for record changes
//!
//! Every create, update and delete of a facility, payment, region or office
//! is appended to `audit.log` as one JSON line holding the record before and
//! after the change and a short field diff.

mod diff;
mod entry;
mod logger;

pub use diff::{diff_records, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
