//! Payment display formatting

use tabled::Tabled;

use super::{or_dash, render_table, truncate};
use crate::models::{Money, Payment};

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Date")]
    date: String,
}

/// Table of payments followed by their total
pub fn format_payment_list(payments: &[Payment], currency: &str) -> String {
    if payments.is_empty() {
        return "No payments found.".to_string();
    }

    let rows = payments
        .iter()
        .map(|p| PaymentRow {
            id: p.id.to_string(),
            name: truncate(&p.name, 30),
            location: truncate(&p.location, 20),
            sector: or_dash(p.sector.as_deref()),
            category: or_dash(p.category.as_deref()),
            amount: p.amount_paid.format_with_symbol(currency),
            date: p.payment_date.clone(),
        })
        .collect();

    let total: Money = payments.iter().map(|p| p.amount_paid).sum();
    format!(
        "{}\n\nTotal: {} payments, {}",
        render_table(rows),
        payments.len(),
        total.format_with_symbol(currency)
    )
}

pub fn format_payment_details(payment: &Payment, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Payment: {}\n", payment.name));
    output.push_str(&format!("  ID:        {}\n", payment.id));
    output.push_str(&format!(
        "  Amount:    {}\n",
        payment.amount_paid.format_with_symbol(currency)
    ));
    output.push_str(&format!("  Date:      {}\n", payment.payment_date));
    output.push_str(&format!("  Location:  {}\n", payment.location));
    output.push_str(&format!("  Sector:    {}\n", or_dash(payment.sector.as_deref())));
    output.push_str(&format!("  Category:  {}\n", or_dash(payment.category.as_deref())));
    output.push_str(&format!(
        "  Recorded:  {}\n",
        payment.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}
