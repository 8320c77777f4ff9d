//! Payment CLI commands

use clap::Subcommand;

use super::resolve_today;
use crate::config::Settings;
use crate::display::{format_payment_details, format_payment_list};
use crate::error::PermitResult;
use crate::lifecycle::serialize_date_for_export;
use crate::models::{Money, RecordScope};
use crate::services::{PaymentInput, PaymentService};
use crate::storage::Storage;

fn parse_amount(s: &str) -> Result<Money, String> {
    Money::parse(s).map_err(|e| e.to_string())
}

/// Payment subcommands
#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment in the selected region/office
    Add {
        /// Payer name
        name: String,
        /// Amount paid, e.g. 1250.50
        #[arg(value_parser = parse_amount)]
        amount: Money,
        #[arg(short, long)]
        location: String,
        /// Payment date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        sector: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List payments
    List {
        #[arg(short, long)]
        sector: Option<String>,
    },
    /// Search by payer name and/or location
    Search {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Show payment details
    Show {
        /// Payment ID
        payment: String,
    },
    /// Delete a payment
    Delete {
        /// Payment ID
        payment: String,
    },
}

/// Handle a payment command
pub fn handle_payment_command(
    storage: &Storage,
    settings: &Settings,
    scope: &RecordScope,
    cmd: PaymentCommands,
) -> PermitResult<()> {
    let service = PaymentService::new(storage, settings);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        PaymentCommands::Add {
            name,
            amount,
            location,
            date,
            sector,
            category,
        } => {
            let payment_date = match date {
                Some(date) => date,
                None => serialize_date_for_export(resolve_today(None, settings)?),
            };
            let payment = service.create(
                PaymentInput {
                    name,
                    location,
                    sector,
                    category,
                    amount_paid: amount,
                    payment_date,
                },
                scope,
            )?;
            println!(
                "Recorded payment: {} {} on {} ({})",
                payment.name,
                payment.amount_paid.format_with_symbol(currency),
                payment.payment_date,
                payment.id
            );
        }

        PaymentCommands::List { sector } => {
            let scope = scope.clone().with_sector(sector.as_deref());
            let payments = service.list(&scope)?;
            println!("{}", format_payment_list(&payments, currency));
        }

        PaymentCommands::Search { name, location } => {
            let payments = service.search(name.as_deref(), location.as_deref(), scope)?;
            println!("{}", format_payment_list(&payments, currency));
        }

        PaymentCommands::Show { payment } => {
            let payment = service.resolve(&payment)?;
            print!("{}", format_payment_details(&payment, currency));
        }

        PaymentCommands::Delete { payment } => {
            let existing = service.resolve(&payment)?;
            let deleted = service.delete(existing.id)?;
            println!("Deleted payment: {}", deleted);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,250.50"), Ok(Money::from_minor(125_050)));
        assert!(parse_amount("-3").is_err());
    }
}
