//! Facility display formatting

use chrono::NaiveDate;
use tabled::Tabled;

use super::{or_dash, render_table, truncate};
use crate::lifecycle::{days_until, LifecycleStatus};
use crate::models::Facility;

#[derive(Tabled)]
struct FacilityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Expiry")]
    expiry: String,
    #[tabled(rename = "Status")]
    status: LifecycleStatus,
}

/// Table of facilities with their status
pub fn format_facility_list(facilities: &[(Facility, LifecycleStatus)]) -> String {
    if facilities.is_empty() {
        return "No facilities found.".to_string();
    }

    let rows = facilities
        .iter()
        .map(|(f, status)| FacilityRow {
            id: f.id.to_string(),
            name: truncate(&f.name, 32),
            sector: or_dash(f.sector.as_deref()),
            location: truncate(&f.location, 24),
            expiry: or_dash(f.expiry_date.as_deref()),
            status: *status,
        })
        .collect();

    format!(
        "{}\n\nTotal: {} facilities",
        render_table(rows),
        facilities.len()
    )
}

pub fn format_facility_details(
    facility: &Facility,
    status: LifecycleStatus,
    today: NaiveDate,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Facility: {}\n", facility.name));
    output.push_str(&format!("  ID:             {}\n", facility.id));
    output.push_str(&format!("  Sector:         {}\n", or_dash(facility.sector.as_deref())));
    output.push_str(&format!("  Location:       {}\n", or_dash(Some(facility.location.as_str()))));
    output.push_str(&format!("  District:       {}\n", or_dash(Some(facility.district.as_str()))));
    output.push_str(&format!(
        "  File Location:  {}\n",
        or_dash(Some(facility.file_location_id.as_str()))
    ));
    output.push_str(&format!(
        "  Effective:      {}\n",
        or_dash(facility.effective_date.as_deref())
    ));
    output.push_str(&format!(
        "  Expiry:         {}\n",
        or_dash(facility.expiry_date.as_deref())
    ));

    let remaining = match days_until(today, &facility.expiry()) {
        Some(days) if days >= 0 => format!(" ({} days left)", days),
        Some(days) => format!(" ({} days ago)", -days),
        None => String::new(),
    };
    output.push_str(&format!("  Status:         {}{}\n", status, remaining));

    output.push_str(&format!(
        "  Created:        {}\n",
        facility.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "  Updated:        {}\n",
        facility.updated_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_facility_list(&[]), "No facilities found.");
    }

    #[test]
    fn test_list_shows_status() {
        let mut facility = Facility::new("Acme Quarry");
        facility.sector = Some("mining".into());
        facility.expiry_date = Some("01/08/2025".into());

        let output = format_facility_list(&[(facility, LifecycleStatus::Expiring)]);
        assert!(output.contains("Acme Quarry"));
        assert!(output.contains("expiring"));
        assert!(output.contains("01/08/2025"));
        assert!(output.contains("Total: 1 facilities"));
    }

    #[test]
    fn test_details_days_left() {
        let mut facility = Facility::new("Acme Quarry");
        facility.expiry_date = Some("25/06/2025".into());

        let output = format_facility_details(&facility, LifecycleStatus::Expiring, today());
        assert!(output.contains("Status:         expiring (10 days left)"));
        assert!(output.contains("District:       -"));
    }
}
