//! Dashboard rendering
//!
//! Headline counts, a per-sector status breakdown, the expiring and expired
//! lists and the most recent records.

use tabled::Tabled;

use super::{or_dash, render_table, truncate};
use crate::services::{Dashboard, FlaggedFacility};

#[derive(Tabled)]
struct SectorRow {
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Valid")]
    valid: usize,
    #[tabled(rename = "Expiring")]
    expiring: usize,
    #[tabled(rename = "Expired")]
    expired: usize,
    #[tabled(rename = "Total")]
    total: usize,
}

#[derive(Tabled)]
struct FlaggedRow {
    #[tabled(rename = "Facility")]
    name: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
    #[tabled(rename = "Days")]
    days: String,
}

fn flagged_table(flagged: &[FlaggedFacility]) -> String {
    let rows = flagged
        .iter()
        .map(|f| FlaggedRow {
            name: truncate(&f.facility.name, 32),
            sector: or_dash(f.facility.sector.as_deref()),
            expiry: or_dash(f.facility.expiry_date.as_deref()),
            days: f.days_left.map_or_else(|| "?".to_string(), |d| d.to_string()),
        })
        .collect();
    render_table(rows)
}

pub fn format_dashboard(dashboard: &Dashboard, scope_label: &str, currency: &str) -> String {
    let totals = &dashboard.tally.totals;
    let mut output = String::new();

    output.push_str(&format!(
        "Dashboard: {} (as of {})\n",
        scope_label,
        dashboard.today.format("%d/%m/%Y")
    ));
    output.push_str(&format!("{}\n\n", "=".repeat(40)));

    output.push_str(&format!("Facilities:  {}\n", dashboard.total_facilities()));
    output.push_str(&format!("  Valid:     {}\n", totals.valid));
    output.push_str(&format!(
        "  Expiring:  {} (within {} days)\n",
        totals.expiring, dashboard.horizon_days
    ));
    output.push_str(&format!("  Expired:   {}\n", totals.expired));
    output.push_str(&format!("Payments:    {}\n", dashboard.total_payments));
    output.push_str(&format!(
        "Revenue:     {}\n",
        dashboard.revenue.format_with_symbol(currency)
    ));

    if !dashboard.tally.sectors.is_empty() {
        let rows = dashboard
            .tally
            .sectors
            .iter()
            .map(|(sector, counts)| SectorRow {
                sector: sector.to_string(),
                valid: counts.valid,
                expiring: counts.expiring,
                expired: counts.expired,
                total: counts.total(),
            })
            .collect();
        output.push_str("\nBy sector:\n");
        output.push_str(&render_table(rows));
        output.push('\n');
    }

    if !dashboard.expiring.is_empty() {
        output.push_str("\nExpiring soon:\n");
        output.push_str(&flagged_table(&dashboard.expiring));
        output.push('\n');
    }

    if !dashboard.expired.is_empty() {
        output.push_str("\nExpired:\n");
        output.push_str(&flagged_table(&dashboard.expired));
        output.push('\n');
    }

    if !dashboard.recent_facilities.is_empty() {
        output.push_str("\nRecent facilities:\n");
        for facility in &dashboard.recent_facilities {
            output.push_str(&format!(
                "  {:<32} {}\n",
                truncate(&facility.name, 32),
                facility.created_at.format("%Y-%m-%d")
            ));
        }
    }

    if !dashboard.recent_payments.is_empty() {
        output.push_str("\nRecent payments:\n");
        for payment in &dashboard.recent_payments {
            output.push_str(&format!(
                "  {:<32} {:>14}  {}\n",
                truncate(&payment.name, 32),
                payment.amount_paid.format_with_symbol(currency),
                payment.payment_date
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{LifecycleStatus, LifecycleTally};
    use crate::models::{Facility, Money};
    use chrono::NaiveDate;

    fn dashboard() -> Dashboard {
        let mut quarry = Facility::new("Acme Quarry");
        quarry.sector = Some("mining".into());
        quarry.expiry_date = Some("01/07/2025".into());

        let tally: LifecycleTally = [
            (Some("mining"), LifecycleStatus::Expiring),
            (Some("Mining "), LifecycleStatus::Valid),
            (None, LifecycleStatus::Expired),
        ]
        .into_iter()
        .collect();

        Dashboard {
            today: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            horizon_days: 90,
            tally,
            expiring: vec![FlaggedFacility {
                facility: quarry.clone(),
                days_left: Some(16),
            }],
            expired: Vec::new(),
            total_payments: 1,
            revenue: Money::from_minor(50_000),
            recent_facilities: vec![quarry],
            recent_payments: Vec::new(),
        }
    }

    #[test]
    fn test_dashboard_sections() {
        let output = format_dashboard(&dashboard(), "All Regions", "GH₵");
        assert!(output.starts_with("Dashboard: All Regions (as of 15/06/2025)"));
        assert!(output.contains("Facilities:  3"));
        assert!(output.contains("Expiring:  1 (within 90 days)"));
        assert!(output.contains("Revenue:     GH₵500.00"));
        assert!(output.contains("MINING"));
        assert!(output.contains("UNKNOWN"));
        assert!(output.contains("Expiring soon:"));
        assert!(!output.contains("\nExpired:\n"));
    }
}
