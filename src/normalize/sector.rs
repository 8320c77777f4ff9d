//! Sector name canonicalization
//!
//! Sector labels are typed by hand and arrive with stray whitespace, mixed
//! case, doubled letters and singular/plural variants. Known spellings map to
//! one canonical form; anything else passes through (trimmed) so new sectors
//! can be introduced without code changes.

/// Label used for facilities with no sector
pub const UNKNOWN_SECTOR: &str = "UNKNOWN";

/// Canonical sector for a free-text label
pub fn normalize_sector(raw: &str) -> String {
    let trimmed = raw.trim();
    let key = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match canonical_sector(&key) {
        Some(canonical) => canonical.to_string(),
        None => trimmed.to_string(),
    }
}

/// Upper-cased grouping label for dashboards and sector filters
pub fn sector_label(sector: Option<&str>) -> String {
    match sector.map(str::trim) {
        Some(s) if !s.is_empty() => normalize_sector(s).to_uppercase(),
        _ => UNKNOWN_SECTOR.to_string(),
    }
}

fn canonical_sector(key: &str) -> Option<&'static str> {
    let canonical = match key {
        "hospitality" | "hhospitality" | "hhospitlity" | "hospitlity" => "hospitality",
        "health" | "healthcare" => "health",
        "mining" | "mines" => "mining",
        "small scale mining" | "small-scale mining" => "small scale mining",
        "mines and quarry" | "mines & quarry" | "mines and quarries" => "mines and quarry",
        "quarry" | "quarries" => "quarry",
        "infrastructure" | "iinfrastructure" => "infrastructure",
        "education" => "education",
        "agriculture" => "agriculture",
        "manufacturing" => "manufacturing",
        "tourism" => "tourism",
        "finance" => "finance",
        "transportation" | "transport" => "transportation",
        "energy" => "energy",
        "chemicals" | "chemical" => "chemicals",
        "chemicals & pesticides"
        | "chemicals & pesticide"
        | "chemical & pesticides"
        | "chemical & pesticide"
        | "chemicals and pesticides"
        | "chemicals and pesticide" => "chemicals & pesticides",
        "telecommunication" | "telecommunications" | "telecom" => "telecommunication",
        _ => return None,
    };
    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(normalize_sector(" Mining"), "mining");
        assert_eq!(normalize_sector("MINING"), "mining");
        assert_eq!(normalize_sector(" Agriculture "), "agriculture");
        assert_eq!(normalize_sector("SMALL  SCALE MINING"), "small scale mining");
    }

    #[test]
    fn test_plural_variants_agree() {
        assert_eq!(
            normalize_sector(" Chemicals & Pesticides "),
            normalize_sector("chemicals & pesticide")
        );
        assert_eq!(normalize_sector("CHEMICALS & PESTICIDE "), "chemicals & pesticides");
    }

    #[test]
    fn test_misspellings() {
        assert_eq!(normalize_sector("HHOSPITALITY"), "hospitality");
        assert_eq!(normalize_sector("HHospitlity"), "hospitality");
        assert_eq!(normalize_sector("IINFRASTRUCTURE"), "infrastructure");
    }

    #[test]
    fn test_unknown_passes_through_trimmed() {
        assert_eq!(normalize_sector("  Fisheries "), "Fisheries");
        assert_eq!(normalize_sector("N"), "N");
        assert_eq!(normalize_sector(""), "");
    }

    #[test]
    fn test_sector_label() {
        assert_eq!(sector_label(Some(" Mining")), "MINING");
        assert_eq!(sector_label(Some("chemicals & pesticide")), "CHEMICALS & PESTICIDES");
        assert_eq!(sector_label(Some("Fisheries")), "FISHERIES");
        assert_eq!(sector_label(Some("")), UNKNOWN_SECTOR);
        assert_eq!(sector_label(None), UNKNOWN_SECTOR);
    }
}
