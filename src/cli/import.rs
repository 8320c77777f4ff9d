//! CLI command handler for spreadsheet import
//!
//! Reads a CSV file or a workbook's first worksheet, shows a validation
//! preview, and unless `--dry-run` is given writes the valid rows.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::PermitResult;
use crate::models::RecordScope;
use crate::services::{read_sheet, ImportPreview, ImportService, ImportSummary};
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import facilities, merging rows into existing facilities by name
    Facilities {
        /// Path to a CSV, XLSX, XLS or ODS file
        file: PathBuf,
        /// Validate and preview without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Import payments
    Payments {
        /// Path to a CSV, XLSX, XLS or ODS file
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
}

const PREVIEW_ERRORS: usize = 20;

fn print_preview<T>(label: &str, preview: &ImportPreview<T>) {
    println!("Import Preview: {}", label);
    println!("{}", "=".repeat(40));
    println!("  Rows:     {}", preview.rows.len());
    println!("  Valid:    {}", preview.valid_count());
    println!("  Invalid:  {}", preview.invalid_count());

    let errors: Vec<_> = preview.errors().collect();
    if !errors.is_empty() {
        println!();
        println!("Validation errors:");
        for error in errors.iter().take(PREVIEW_ERRORS) {
            println!("  {}", error);
        }
        if errors.len() > PREVIEW_ERRORS {
            println!("  ... and {} more", errors.len() - PREVIEW_ERRORS);
        }
    }
    println!();
}

fn print_summary(summary: &ImportSummary, changes: usize) {
    println!("Import Complete!");
    println!("  Inserted:  {}", summary.inserted);
    println!("  Updated:   {}", summary.updated);
    println!("  Skipped:   {}", summary.skipped);
    println!("  Changes published: {}", changes);
}

/// Handle an import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    scope: &RecordScope,
    cmd: ImportCommands,
) -> PermitResult<()> {
    let service = ImportService::new(storage, settings);

    let (file, dry_run) = match &cmd {
        ImportCommands::Facilities { file, dry_run } | ImportCommands::Payments { file, dry_run } => {
            (file, *dry_run)
        }
    };

    let rows = read_sheet(file)?;
    tracing::info!(file = %file.display(), rows = rows.len(), "spreadsheet read");

    if rows.is_empty() {
        println!("No rows found in {}.", file.display());
        return Ok(());
    }

    let feed = storage.feed().subscribe();

    let summary = match cmd {
        ImportCommands::Facilities { .. } => {
            let preview = service.preview_facilities(&rows);
            print_preview("facilities", &preview);
            if dry_run {
                println!("Dry run: nothing written.");
                return Ok(());
            }
            service.commit_facilities(preview, scope)?
        }
        ImportCommands::Payments { .. } => {
            let preview = service.preview_payments(&rows);
            print_preview("payments", &preview);
            if dry_run {
                println!("Dry run: nothing written.");
                return Ok(());
            }
            service.commit_payments(preview, scope)?
        }
    };

    print_summary(&summary, feed.try_iter().count());
    Ok(())
}
