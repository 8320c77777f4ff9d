//! Region and office service

use crate::audit::EntityType;
use crate::error::{PermitError, PermitResult};
use crate::models::{Office, Region, RegionId, RecordScope};
use crate::storage::Storage;

pub struct RegionService<'a> {
    storage: &'a Storage,
}

impl<'a> RegionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn add_region(&self, name: &str, code: &str) -> PermitResult<Region> {
        let region = Region::new(name.trim(), code);
        region.validate().map_err(PermitError::Validation)?;

        let taken = self.storage.regions.get_all_regions()?.into_iter().any(|r| {
            r.name.eq_ignore_ascii_case(&region.name)
                || (!region.code.is_empty() && r.code == region.code)
        });
        if taken {
            return Err(PermitError::Duplicate {
                entity_type: "Region",
                identifier: region.name,
            });
        }

        self.storage.regions.upsert_region(region.clone())?;
        self.storage.regions.save()?;
        self.storage.log_create(
            EntityType::Region,
            region.id.to_string(),
            Some(region.name.clone()),
            &region,
        )?;

        Ok(region)
    }

    /// Add an office under an existing region
    pub fn add_office(&self, region: &str, name: &str) -> PermitResult<Office> {
        let region = self.resolve_region(region)?;
        let office = Office::new(region.id, name.trim());
        office.validate().map_err(PermitError::Validation)?;

        if self
            .storage
            .regions
            .offices_for_region(region.id)?
            .iter()
            .any(|o| o.name.eq_ignore_ascii_case(&office.name))
        {
            return Err(PermitError::Duplicate {
                entity_type: "Office",
                identifier: format!("{} - {}", region.name, office.name),
            });
        }

        self.storage.regions.upsert_office(office.clone())?;
        self.storage.regions.save()?;
        self.storage.log_create(
            EntityType::Office,
            office.id.to_string(),
            Some(office.name.clone()),
            &office,
        )?;

        Ok(office)
    }

    pub fn list_regions(&self) -> PermitResult<Vec<Region>> {
        self.storage.regions.get_all_regions()
    }

    /// Offices of one region, or all offices
    pub fn list_offices(&self, region: Option<RegionId>) -> PermitResult<Vec<Office>> {
        match region {
            Some(id) => self.storage.regions.offices_for_region(id),
            None => self.storage.regions.get_all_offices(),
        }
    }

    /// Region by id, name or code
    pub fn resolve_region(&self, identifier: &str) -> PermitResult<Region> {
        self.storage
            .regions
            .get_all_regions()?
            .into_iter()
            .find(|r| r.matches(identifier))
            .ok_or_else(|| PermitError::region_not_found(identifier))
    }

    /// Office by id or name within `region`
    pub fn resolve_office(&self, region: RegionId, identifier: &str) -> PermitResult<Office> {
        self.storage
            .regions
            .offices_for_region(region)?
            .into_iter()
            .find(|o| o.matches(identifier))
            .ok_or_else(|| PermitError::office_not_found(identifier))
    }

    /// Human-readable location of a scope
    pub fn describe(&self, scope: &RecordScope) -> PermitResult<String> {
        let region = match scope.region_id {
            Some(id) => self.storage.regions.get_region(id)?,
            None => None,
        };
        let office = match scope.office_id {
            Some(id) => self.storage.regions.get_office(id)?,
            None => None,
        };
        Ok(scope.describe(region.as_ref(), office.as_ref()))
    }
}
