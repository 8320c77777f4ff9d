//! Facility CLI commands

use clap::Subcommand;

use super::resolve_today;
use crate::config::Settings;
use crate::display::{format_facility_details, format_facility_list};
use crate::error::{PermitError, PermitResult};
use crate::lifecycle::LifecycleStatus;
use crate::models::RecordScope;
use crate::services::{FacilityChanges, FacilityInput, FacilityService};
use crate::storage::Storage;

/// Facility subcommands
#[derive(Subcommand)]
pub enum FacilityCommands {
    /// Register a facility in the selected region/office
    Add {
        /// Facility name
        name: String,
        #[arg(short, long, default_value = "")]
        location: String,
        #[arg(short, long, default_value = "")]
        district: String,
        #[arg(short, long)]
        sector: Option<String>,
        /// Physical file reference
        #[arg(short, long, default_value = "")]
        file_location: String,
        /// Permit effective date
        #[arg(long)]
        effective: Option<String>,
        /// Permit expiry date
        #[arg(short, long)]
        expiry: Option<String>,
    },
    /// List facilities
    List {
        /// Only this sector
        #[arg(short, long)]
        sector: Option<String>,
        /// Only this status (valid, expiring, expired)
        #[arg(long)]
        status: Option<LifecycleStatus>,
        /// Classify against this date instead of today
        #[arg(long)]
        today: Option<String>,
    },
    /// Search by name, sector, location or district
    Search {
        term: String,
        #[arg(long)]
        today: Option<String>,
    },
    /// Show facility details
    Show {
        /// Facility name or ID
        facility: String,
        #[arg(long)]
        today: Option<String>,
    },
    /// Edit a facility; an empty value clears the field
    Update {
        /// Facility name or ID
        facility: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        district: Option<String>,
        #[arg(short, long)]
        sector: Option<String>,
        #[arg(short, long)]
        file_location: Option<String>,
        #[arg(long)]
        effective: Option<String>,
        #[arg(short, long)]
        expiry: Option<String>,
    },
    /// Delete a facility
    Delete {
        /// Facility name or ID
        facility: String,
    },
}

/// Handle a facility command
pub fn handle_facility_command(
    storage: &Storage,
    settings: &Settings,
    scope: &RecordScope,
    cmd: FacilityCommands,
) -> PermitResult<()> {
    let service = FacilityService::new(storage, settings);

    match cmd {
        FacilityCommands::Add {
            name,
            location,
            district,
            sector,
            file_location,
            effective,
            expiry,
        } => {
            let facility = service.create(
                FacilityInput {
                    name,
                    location,
                    district,
                    sector,
                    file_location_id: file_location,
                    effective_date: effective,
                    expiry_date: expiry,
                },
                scope,
            )?;
            println!("Created facility: {} ({})", facility.name, facility.id);
            if let Some(expiry) = &facility.expiry_date {
                println!("  Expiry: {}", expiry);
            }
        }

        FacilityCommands::List {
            sector,
            status,
            today,
        } => {
            let today = resolve_today(today.as_deref(), settings)?;
            let scope = scope.clone().with_sector(sector.as_deref());
            let facilities: Vec<_> = service
                .classified(&scope, today)?
                .into_iter()
                .filter(|(_, s)| status.map_or(true, |wanted| *s == wanted))
                .collect();
            println!("{}", format_facility_list(&facilities));
        }

        FacilityCommands::Search { term, today } => {
            let today = resolve_today(today.as_deref(), settings)?;
            let facilities: Vec<_> = service
                .search(&term, scope)?
                .into_iter()
                .map(|f| {
                    let status = service.status_of(&f, today);
                    (f, status)
                })
                .collect();
            println!("{}", format_facility_list(&facilities));
        }

        FacilityCommands::Show { facility, today } => {
            let today = resolve_today(today.as_deref(), settings)?;
            let facility = service.resolve(&facility)?;
            let status = service.status_of(&facility, today);
            print!("{}", format_facility_details(&facility, status, today));
        }

        FacilityCommands::Update {
            facility,
            name,
            location,
            district,
            sector,
            file_location,
            effective,
            expiry,
        } => {
            let changes = FacilityChanges {
                name,
                location,
                district,
                sector,
                file_location_id: file_location,
                effective_date: effective,
                expiry_date: expiry,
            };
            if changes.is_empty() {
                return Err(PermitError::Validation(
                    "Nothing to update; pass at least one field".into(),
                ));
            }

            let existing = service.resolve(&facility)?;
            let updated = service.update(existing.id, changes)?;
            println!("Updated facility: {} ({})", updated.name, updated.id);
        }

        FacilityCommands::Delete { facility } => {
            let existing = service.resolve(&facility)?;
            let deleted = service.delete(existing.id)?;
            println!("Deleted facility: {}", deleted.name);
        }
    }

    Ok(())
}
