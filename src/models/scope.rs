//! Record scope
//!
//! The region/office/sector partition applied to listings, dashboards and
//! exports. Region and office compare by exact id; sector compares the
//! upper-cased canonical labels so "Mining", " mining" and "MINING" agree.

use serde::{Deserialize, Serialize};

use super::facility::Facility;
use super::ids::{OfficeId, RegionId};
use super::payment::Payment;
use super::region::{Office, Region};
use crate::normalize::sector_label;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordScope {
    pub region_id: Option<RegionId>,
    pub office_id: Option<OfficeId>,
    pub sector: Option<String>,
}

impl RecordScope {
    /// Scope that admits every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(region_id: Option<RegionId>, office_id: Option<OfficeId>) -> Self {
        Self {
            region_id,
            office_id,
            sector: None,
        }
    }

    /// Narrow to one sector; blank values clear the sector filter
    pub fn with_sector(mut self, sector: Option<&str>) -> Self {
        self.sector = sector
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.region_id.is_none() && self.office_id.is_none() && self.sector.is_none()
    }

    fn admits(
        &self,
        region_id: Option<RegionId>,
        office_id: Option<OfficeId>,
        sector: Option<&str>,
    ) -> bool {
        if self.region_id.is_some() && self.region_id != region_id {
            return false;
        }
        if self.office_id.is_some() && self.office_id != office_id {
            return false;
        }
        match &self.sector {
            Some(wanted) => sector_label(Some(wanted)) == sector_label(sector),
            None => true,
        }
    }

    pub fn admits_facility(&self, facility: &Facility) -> bool {
        self.admits(
            facility.region_id,
            facility.office_id,
            facility.sector.as_deref(),
        )
    }

    pub fn admits_payment(&self, payment: &Payment) -> bool {
        self.admits(payment.region_id, payment.office_id, payment.sector.as_deref())
    }

    /// Human-readable location: "All Regions", "<region>" or "<region> - <office>"
    pub fn describe(&self, region: Option<&Region>, office: Option<&Office>) -> String {
        match (region, office) {
            (Some(region), Some(office)) => format!("{} - {}", region.name, office.name),
            (Some(region), None) => region.name.clone(),
            _ => "All Regions".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_unrestricted_admits_everything() {
        let scope = RecordScope::all();
        assert!(scope.is_unrestricted());
        assert!(scope.admits_facility(&Facility::new("Acme")));
    }

    #[test]
    fn test_region_and_office_are_exact() {
        let region = RegionId::new();
        let office = OfficeId::new();
        let mut facility = Facility::new("Acme");
        facility.region_id = Some(region);

        let scope = RecordScope::new(Some(region), None);
        assert!(scope.admits_facility(&facility));

        let scope = RecordScope::new(Some(region), Some(office));
        assert!(!scope.admits_facility(&facility));

        facility.office_id = Some(office);
        assert!(scope.admits_facility(&facility));

        let other = RecordScope::new(Some(RegionId::new()), None);
        assert!(!other.admits_facility(&facility));
    }

    #[test]
    fn test_sector_compares_labels() {
        let mut payment = Payment::new("Acme", "Tema", Money::from_minor(100), "01/01/2025");
        payment.sector = Some(" mining".into());

        let scope = RecordScope::all().with_sector(Some("MINING"));
        assert!(scope.admits_payment(&payment));

        let scope = RecordScope::all().with_sector(Some("health"));
        assert!(!scope.admits_payment(&payment));

        let scope = RecordScope::all().with_sector(Some("  "));
        assert!(scope.sector.is_none());
    }

    #[test]
    fn test_unknown_sector_filter() {
        let facility = Facility::new("No Sector Ltd");
        let scope = RecordScope::all().with_sector(Some("unknown"));
        assert!(scope.admits_facility(&facility));
    }

    #[test]
    fn test_describe() {
        let region = Region::new("Greater Accra", "GAR");
        let office = Office::new(region.id, "Tema");
        let scope = RecordScope::all();
        assert_eq!(scope.describe(None, None), "All Regions");
        assert_eq!(scope.describe(Some(&region), None), "Greater Accra");
        assert_eq!(
            scope.describe(Some(&region), Some(&office)),
            "Greater Accra - Tema"
        );
    }
}
