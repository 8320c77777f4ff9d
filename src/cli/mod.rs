//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod dashboard;
pub mod export;
pub mod facility;
pub mod import;
pub mod payment;
pub mod region;

use chrono::{Local, NaiveDate};

use crate::config::Settings;
use crate::error::{PermitError, PermitResult};
use crate::lifecycle::{parse_date_with, DateInput};

pub use dashboard::{handle_classify_command, handle_dashboard_command, handle_history_command};
pub use export::{handle_export_command, ExportCommands};
pub use facility::{handle_facility_command, FacilityCommands};
pub use import::{handle_import_command, ImportCommands};
pub use payment::{handle_payment_command, PaymentCommands};
pub use region::{handle_region_command, RegionCommands};

/// The reference day for classification: the given date, or the local date
pub fn resolve_today(value: Option<&str>, settings: &Settings) -> PermitResult<NaiveDate> {
    match value {
        None => Ok(Local::now().date_naive()),
        Some(text) => parse_date_with(DateInput::from_cell(text), settings.date_order)
            .date()
            .ok_or_else(|| PermitError::Validation(format!("Unreadable date: '{}'", text))),
    }
}
