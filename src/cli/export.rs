//! CLI commands for data export

use std::path::PathBuf;

use clap::Subcommand;

use super::resolve_today;
use crate::config::Settings;
use crate::error::PermitResult;
use crate::export::{
    export_file_stem, export_to_path, facility_table, payment_table, ExportFormat, ExportKind,
};
use crate::lifecycle::LifecycleStatus;
use crate::models::RecordScope;
use crate::services::{FacilityService, PaymentService};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export facilities
    Facilities {
        #[arg(short, long)]
        sector: Option<String>,
        /// Only this status (valid, expiring, expired)
        #[arg(long)]
        status: Option<LifecycleStatus>,
        /// csv or xlsx
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        /// Output path (defaults to a name describing the selection)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        today: Option<String>,
    },
    /// Export payments
    Payments {
        #[arg(short, long)]
        sector: Option<String>,
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn output_path(
    output: Option<PathBuf>,
    kind: ExportKind,
    sector: Option<&str>,
    status: Option<LifecycleStatus>,
    format: ExportFormat,
) -> PathBuf {
    output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}.{}",
            export_file_stem(kind, sector, status),
            format.extension()
        ))
    })
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    scope: &RecordScope,
    cmd: ExportCommands,
) -> PermitResult<()> {
    match cmd {
        ExportCommands::Facilities {
            sector,
            status,
            format,
            output,
            today,
        } => {
            let today = resolve_today(today.as_deref(), settings)?;
            let scope = scope.clone().with_sector(sector.as_deref());
            let facilities =
                FacilityService::new(storage, settings).filter_for_export(&scope, status, today)?;

            let table = facility_table(&facilities);
            let path = output_path(output, ExportKind::Facilities, sector.as_deref(), status, format);
            export_to_path(&table, format, &path)?;
            println!("Exported {} facilities to {}", table.len(), path.display());
        }

        ExportCommands::Payments {
            sector,
            format,
            output,
        } => {
            let scope = scope.clone().with_sector(sector.as_deref());
            let payments = PaymentService::new(storage, settings).list(&scope)?;

            let table = payment_table(&payments);
            let path = output_path(output, ExportKind::Payments, sector.as_deref(), None, format);
            export_to_path(&table, format, &path)?;
            println!("Exported {} payments to {}", table.len(), path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = output_path(
            None,
            ExportKind::Facilities,
            Some("Mining"),
            Some(LifecycleStatus::Expired),
            ExportFormat::Xlsx,
        );
        assert_eq!(path, PathBuf::from("facilities-mining-expired.xlsx"));

        let path = output_path(
            Some(PathBuf::from("out.csv")),
            ExportKind::Payments,
            None,
            None,
            ExportFormat::Csv,
        );
        assert_eq!(path, PathBuf::from("out.csv"));
    }
}
