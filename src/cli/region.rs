//! Region and office CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_office_list, format_region_list};
use crate::error::PermitResult;
use crate::models::RecordScope;
use crate::services::RegionService;
use crate::storage::Storage;

/// Region subcommands
#[derive(Subcommand)]
pub enum RegionCommands {
    /// Add a region
    Add {
        name: String,
        /// Short region code, e.g. GA
        code: String,
    },
    /// Add an office to a region
    AddOffice {
        /// Region name, code or ID
        region: String,
        /// Office name
        name: String,
    },
    /// List regions, or the offices of one region
    List {
        /// Show the offices of this region
        #[arg(short, long)]
        offices: Option<String>,
    },
    /// Choose the region/office that scopes listings and new records
    Select {
        /// Region name, code or ID
        region: Option<String>,
        /// Office name or ID within the region
        #[arg(short, long)]
        office: Option<String>,
        /// Clear the selection and work across all regions
        #[arg(long, conflicts_with_all = ["region", "office"])]
        clear: bool,
    },
}

/// Handle a region command
pub fn handle_region_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: RegionCommands,
) -> PermitResult<()> {
    let service = RegionService::new(storage);
    let scope = RecordScope::new(settings.selected_region, settings.selected_office);

    match cmd {
        RegionCommands::Add { name, code } => {
            let region = service.add_region(&name, &code)?;
            println!("Created region: {} [{}] ({})", region.name, region.code, region.id);
        }

        RegionCommands::AddOffice { region, name } => {
            let office = service.add_office(&region, &name)?;
            println!("Created office: {} ({})", office.name, office.id);
        }

        RegionCommands::List { offices } => {
            let regions = service.list_regions()?;
            match offices {
                Some(region) => {
                    let region = service.resolve_region(&region)?;
                    let offices = service.list_offices(Some(region.id))?;
                    println!("{}", format_office_list(&offices, &regions, &scope));
                }
                None => {
                    let offices = service.list_offices(None)?;
                    println!("{}", format_region_list(&regions, &offices, &scope));
                }
            }
        }

        RegionCommands::Select {
            region,
            office,
            clear,
        } => {
            if clear || region.is_none() {
                settings.selected_region = None;
                settings.selected_office = None;
            } else if let Some(region) = region {
                let region = service.resolve_region(&region)?;
                let office = match office {
                    Some(office) => Some(service.resolve_office(region.id, &office)?.id),
                    None => None,
                };
                settings.selected_region = Some(region.id);
                settings.selected_office = office;
            }
            settings.save(storage.paths())?;

            let scope = RecordScope::new(settings.selected_region, settings.selected_office);
            println!("Working in: {}", service.describe(&scope)?);
        }
    }

    Ok(())
}
