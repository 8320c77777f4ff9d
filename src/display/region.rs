//! Region and office listings

use tabled::Tabled;

use super::render_table;
use crate::models::{Office, Region, RecordScope};

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Offices")]
    offices: usize,
}

#[derive(Tabled)]
struct OfficeRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Office")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "*"
    } else {
        ""
    }
}

/// Regions with their office counts; the selected region is starred
pub fn format_region_list(regions: &[Region], offices: &[Office], scope: &RecordScope) -> String {
    if regions.is_empty() {
        return "No regions found.".to_string();
    }

    let rows = regions
        .iter()
        .map(|r| RegionRow {
            marker: marker(scope.region_id == Some(r.id)),
            id: r.id.to_string(),
            code: r.code.clone(),
            name: r.name.clone(),
            offices: offices.iter().filter(|o| o.region_id == r.id).count(),
        })
        .collect();

    render_table(rows)
}

pub fn format_office_list(offices: &[Office], regions: &[Region], scope: &RecordScope) -> String {
    if offices.is_empty() {
        return "No offices found.".to_string();
    }

    let rows = offices
        .iter()
        .map(|o| OfficeRow {
            marker: marker(scope.office_id == Some(o.id)),
            id: o.id.to_string(),
            name: o.name.clone(),
            region: regions
                .iter()
                .find(|r| r.id == o.region_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "(unknown)".to_string()),
        })
        .collect();

    render_table(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_list_counts_offices() {
        let region = Region::new("Greater Accra", "ga");
        let offices = vec![
            Office::new(region.id, "Tema"),
            Office::new(region.id, "Accra Central"),
        ];
        let scope = RecordScope::new(Some(region.id), None);

        let output = format_region_list(&[region.clone()], &offices, &scope);
        assert!(output.contains("Greater Accra"));
        assert!(output.contains("GA"));
        assert!(output.contains('*'));

        let output = format_office_list(&offices, &[region], &scope);
        assert!(output.contains("Tema"));
        assert!(output.contains("Greater Accra"));
    }

    #[test]
    fn test_empty_lists() {
        let scope = RecordScope::all();
        assert_eq!(format_region_list(&[], &[], &scope), "No regions found.");
        assert_eq!(format_office_list(&[], &[], &scope), "No offices found.");
    }
}
