//! Dashboard, classification and history commands

use crate::config::Settings;
use crate::display::format_dashboard;
use crate::error::PermitResult;
use crate::lifecycle::{
    days_until, parse_date_with, serialize_date_for_export, DateInput, ParsedDate,
};
use crate::models::RecordScope;
use crate::services::{DashboardService, RegionService};
use crate::storage::Storage;

use super::resolve_today;

pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    scope: &RecordScope,
    sector: Option<&str>,
    today: Option<&str>,
) -> PermitResult<()> {
    let today = resolve_today(today, settings)?;
    let scope = scope.clone().with_sector(sector);

    let dashboard = DashboardService::new(storage, settings).build(today, &scope)?;
    let mut label = RegionService::new(storage).describe(&scope)?;
    if let Some(sector) = &scope.sector {
        label.push_str(&format!(" / {}", sector));
    }

    print!(
        "{}",
        format_dashboard(&dashboard, &label, &settings.currency_symbol)
    );
    Ok(())
}

/// Classify a single date without touching any record
///
/// The date is read like a sheet cell, so a bare serial day count works too.
pub fn handle_classify_command(
    settings: &Settings,
    date: &str,
    today: Option<&str>,
) -> PermitResult<()> {
    let today = resolve_today(today, settings)?;
    let parsed = parse_date_with(DateInput::from_cell(date), settings.date_order);
    let status = settings.lifecycle_policy().classify(today, &parsed);

    match parsed {
        ParsedDate::Date(d) => {
            let days = days_until(today, &parsed).unwrap_or_default();
            println!(
                "{} -> {} ({} days from {})",
                serialize_date_for_export(d),
                status,
                days,
                serialize_date_for_export(today)
            );
        }
        ParsedDate::Missing => println!("no expiry -> {}", status),
        ParsedDate::Unparseable => println!("unreadable date '{}' -> {}", date.trim(), status),
    }
    Ok(())
}

/// Print the most recent audit entries
pub fn handle_history_command(storage: &Storage, limit: usize) -> PermitResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
