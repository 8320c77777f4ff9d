//! Display formatting for terminal output
//!
//! Record lists are rendered as tables with `tabled`; detail views and the
//! dashboard are plain aligned text.

pub mod dashboard;
pub mod facility;
pub mod payment;
pub mod region;

use tabled::settings::Style;
use tabled::{Table, Tabled};

pub use dashboard::format_dashboard;
pub use facility::{format_facility_details, format_facility_list};
pub use payment::{format_payment_details, format_payment_list};
pub use region::{format_office_list, format_region_list};

/// Cut `s` to at most `max` characters, marking the cut with `...`
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

/// Render rows as a psql-style table
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

/// `-` for an absent or blank value
pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Golden Sands Hotel", 10), "Golden ...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("mining")), "mining");
    }
}
