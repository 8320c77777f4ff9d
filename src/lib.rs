//! Permit Desk - facility permit and payment records
//!
//! This library provides the core of the `permit` command-line tool used by
//! licensing offices to keep a register of permitted facilities and the
//! payments they make, and to flag permits that are expiring or expired.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `lifecycle`: Date interpretation and permit status classification
//! - `normalize`: Spreadsheet header aliases and sector canonicalization
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Facilities, payments, regions, offices and scopes
//! - `storage`: JSON record store, change feed and audit hook
//! - `services`: Business logic layer, bulk import and dashboard
//! - `audit`: Append-only change log
//! - `export`: CSV and XLSX output
//! - `display`: Terminal tables
//! - `cli`: Command handlers for the `permit` binary
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use permit_desk::lifecycle::{classify_lifecycle, parse_date, LifecycleStatus};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
//! let status = classify_lifecycle(today, &parse_date("01/08/2025"));
//! assert_eq!(status, LifecycleStatus::Expiring);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod models;
pub mod normalize;
pub mod services;
pub mod storage;

pub use error::PermitError;
