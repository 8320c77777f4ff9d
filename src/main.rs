use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use permit_desk::cli::{
    handle_classify_command, handle_dashboard_command, handle_export_command,
    handle_facility_command, handle_history_command, handle_import_command,
    handle_payment_command, handle_region_command,
};
use permit_desk::config::{PermitPaths, Settings};
use permit_desk::lifecycle::{DateOrder, UnparseablePolicy};
use permit_desk::models::RecordScope;
use permit_desk::services::RegionService;
use permit_desk::storage::Storage;

#[derive(Parser)]
#[command(
    name = "permit",
    version,
    about = "Facility permit and payment records for licensing offices",
    long_about = "Permit Desk keeps the facility register and payment ledger of a \
                  licensing office, flags permits that are expiring or expired, \
                  and moves records in and out of spreadsheets."
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Facility register commands
    #[command(subcommand, alias = "fac")]
    Facility(permit_desk::cli::FacilityCommands),

    /// Payment ledger commands
    #[command(subcommand, alias = "pay")]
    Payment(permit_desk::cli::PaymentCommands),

    /// Regions, offices and the working selection
    #[command(subcommand)]
    Region(permit_desk::cli::RegionCommands),

    /// Bulk upload from a CSV spreadsheet
    #[command(subcommand)]
    Import(permit_desk::cli::ImportCommands),

    /// Write a selection to CSV or XLSX
    #[command(subcommand)]
    Export(permit_desk::cli::ExportCommands),

    /// Lifecycle summary of the current selection
    Dashboard {
        #[arg(short, long)]
        sector: Option<String>,
        /// Classify against this date instead of today
        #[arg(long)]
        today: Option<String>,
    },

    /// Classify a single expiry date
    Classify {
        date: String,
        #[arg(long)]
        today: Option<String>,
    },

    /// Show recent changes from the audit log
    History {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show or change configuration
    Config {
        /// Days ahead in which a permit counts as expiring
        #[arg(long)]
        horizon: Option<u32>,
        /// Status for unreadable expiry dates (expired or valid)
        #[arg(long)]
        unparseable: Option<UnparseablePolicy>,
        /// How a/b/yyyy input is read (day-first or elimination)
        #[arg(long)]
        date_order: Option<DateOrder>,
        #[arg(long)]
        currency: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = PermitPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let scope = RecordScope::new(settings.selected_region, settings.selected_office);

    match cli.command {
        Some(Commands::Facility(cmd)) => {
            handle_facility_command(&storage, &settings, &scope, cmd)?;
        }
        Some(Commands::Payment(cmd)) => {
            handle_payment_command(&storage, &settings, &scope, cmd)?;
        }
        Some(Commands::Region(cmd)) => {
            handle_region_command(&storage, &mut settings, cmd)?;
        }
        Some(Commands::Import(cmd)) => {
            handle_import_command(&storage, &settings, &scope, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, &scope, cmd)?;
        }
        Some(Commands::Dashboard { sector, today }) => {
            handle_dashboard_command(
                &storage,
                &settings,
                &scope,
                sector.as_deref(),
                today.as_deref(),
            )?;
        }
        Some(Commands::Classify { date, today }) => {
            handle_classify_command(&settings, &date, today.as_deref())?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        Some(Commands::Config {
            horizon,
            unparseable,
            date_order,
            currency,
        }) => {
            let changed = horizon.is_some()
                || unparseable.is_some()
                || date_order.is_some()
                || currency.is_some();
            if let Some(days) = horizon {
                settings.expiry_horizon_days = days;
            }
            if let Some(policy) = unparseable {
                settings.unparseable_expiry = policy;
            }
            if let Some(order) = date_order {
                settings.date_order = order;
            }
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("Permit Desk Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Expiry horizon:      {} days", settings.expiry_horizon_days);
            println!("  Unreadable expiry:   {}", settings.unparseable_expiry);
            println!("  Date order:          {}", settings.date_order);
            println!("  Currency:            {}", settings.currency_symbol);
            println!(
                "  Working in:          {}",
                RegionService::new(&storage).describe(&scope)?
            );
        }
        None => {
            println!("Permit Desk - facility permit and payment records");
            println!();
            println!("Run 'permit --help' for usage information.");
            println!("Run 'permit dashboard' for a summary of the current selection.");
        }
    }

    Ok(())
}
