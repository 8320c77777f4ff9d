//! Facility service
//!
//! Creation, editing and lookup of facility records. Sectors and dates are
//! canonicalized here, at write time, so stored records never need read-time
//! cleanup.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{PermitError, PermitResult};
use crate::lifecycle::{normalize_date_cell, LifecycleStatus};
use crate::models::{Facility, FacilityId, RecordScope};
use crate::normalize::normalize_sector;
use crate::storage::Storage;

/// Field values for a new facility, as typed or imported
#[derive(Debug, Clone, Default)]
pub struct FacilityInput {
    pub name: String,
    pub location: String,
    pub district: String,
    pub sector: Option<String>,
    pub file_location_id: String,
    pub effective_date: Option<String>,
    pub expiry_date: Option<String>,
}

/// Field edits; `None` leaves a field alone, an empty string clears it
#[derive(Debug, Clone, Default)]
pub struct FacilityChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub district: Option<String>,
    pub sector: Option<String>,
    pub file_location_id: Option<String>,
    pub effective_date: Option<String>,
    pub expiry_date: Option<String>,
}

impl FacilityChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.district.is_none()
            && self.sector.is_none()
            && self.file_location_id.is_none()
            && self.effective_date.is_none()
            && self.expiry_date.is_none()
    }
}

/// Canonical sector, or none for a blank cell
pub(crate) fn clean_sector(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_sector)
}

pub struct FacilityService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> FacilityService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    fn clean_date(&self, raw: Option<&str>) -> Option<String> {
        raw.and_then(|value| normalize_date_cell(value, self.settings.date_order))
    }

    /// Build a facility record from input without saving it
    pub(crate) fn prepare(&self, input: FacilityInput, scope: &RecordScope) -> Facility {
        let mut facility = Facility::new(input.name.trim());
        facility.location = input.location.trim().to_string();
        facility.district = input.district.trim().to_string();
        facility.sector = clean_sector(input.sector.as_deref());
        facility.file_location_id = input.file_location_id.trim().to_string();
        facility.effective_date = self.clean_date(input.effective_date.as_deref());
        facility.expiry_date = self.clean_date(input.expiry_date.as_deref());
        facility.region_id = scope.region_id;
        facility.office_id = scope.office_id;
        facility
    }

    /// Create a facility inside `scope`; names are unique
    pub fn create(&self, input: FacilityInput, scope: &RecordScope) -> PermitResult<Facility> {
        let facility = self.prepare(input, scope);
        facility
            .validate()
            .map_err(|e| PermitError::Validation(e.to_string()))?;

        if self.storage.facilities.get_by_name(&facility.name)?.is_some() {
            return Err(PermitError::Duplicate {
                entity_type: "Facility",
                identifier: facility.name,
            });
        }

        self.storage.facilities.upsert(facility.clone())?;
        self.storage.facilities.save()?;

        self.storage.log_create(
            EntityType::Facility,
            facility.id.to_string(),
            Some(facility.name.clone()),
            &facility,
        )?;

        tracing::debug!(id = %facility.id, name = %facility.name, "facility created");
        Ok(facility)
    }

    /// Apply edits to an existing facility
    pub fn update(&self, id: FacilityId, changes: FacilityChanges) -> PermitResult<Facility> {
        let before = self
            .storage
            .facilities
            .get(id)?
            .ok_or_else(|| PermitError::facility_not_found(id.to_string()))?;

        let mut facility = before.clone();

        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            if let Some(existing) = self.storage.facilities.get_by_name(&name)? {
                if existing.id != id {
                    return Err(PermitError::Duplicate {
                        entity_type: "Facility",
                        identifier: name,
                    });
                }
            }
            facility.name = name;
        }
        if let Some(location) = changes.location {
            facility.location = location.trim().to_string();
        }
        if let Some(district) = changes.district {
            facility.district = district.trim().to_string();
        }
        if let Some(sector) = changes.sector {
            facility.sector = clean_sector(Some(sector.as_str()));
        }
        if let Some(file_location_id) = changes.file_location_id {
            facility.file_location_id = file_location_id.trim().to_string();
        }
        if let Some(effective) = changes.effective_date {
            facility.effective_date = self.clean_date(Some(effective.as_str()));
        }
        if let Some(expiry) = changes.expiry_date {
            facility.expiry_date = self.clean_date(Some(expiry.as_str()));
        }

        facility
            .validate()
            .map_err(|e| PermitError::Validation(e.to_string()))?;
        facility.updated_at = Utc::now();

        self.storage.facilities.upsert(facility.clone())?;
        self.storage.facilities.save()?;

        self.storage.log_update(
            EntityType::Facility,
            facility.id.to_string(),
            Some(facility.name.clone()),
            &before,
            &facility,
        )?;

        Ok(facility)
    }

    pub fn delete(&self, id: FacilityId) -> PermitResult<Facility> {
        let facility = self
            .storage
            .facilities
            .delete(id)?
            .ok_or_else(|| PermitError::facility_not_found(id.to_string()))?;
        self.storage.facilities.save()?;

        self.storage.log_delete(
            EntityType::Facility,
            facility.id.to_string(),
            Some(facility.name.clone()),
            &facility,
        )?;

        Ok(facility)
    }

    /// Find a facility by name, full id or short id
    pub fn find(&self, identifier: &str) -> PermitResult<Option<Facility>> {
        if let Some(facility) = self.storage.facilities.get_by_name(identifier)? {
            return Ok(Some(facility));
        }

        if let Ok(id) = identifier.trim().parse::<FacilityId>() {
            if let Some(facility) = self.storage.facilities.get(id)? {
                return Ok(Some(facility));
            }
        }

        Ok(self
            .storage
            .facilities
            .get_all()?
            .into_iter()
            .find(|f| f.id.matches(identifier)))
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, identifier: &str) -> PermitResult<Facility> {
        self.find(identifier)?
            .ok_or_else(|| PermitError::facility_not_found(identifier))
    }

    /// Facilities inside `scope`, newest first
    pub fn list(&self, scope: &RecordScope) -> PermitResult<Vec<Facility>> {
        Ok(self
            .storage
            .facilities
            .get_all()?
            .into_iter()
            .filter(|f| scope.admits_facility(f))
            .collect())
    }

    /// Facilities inside `scope` whose name, sector, location or district
    /// contains `term`
    pub fn search(&self, term: &str, scope: &RecordScope) -> PermitResult<Vec<Facility>> {
        Ok(self
            .list(scope)?
            .into_iter()
            .filter(|f| f.matches_term(term))
            .collect())
    }

    /// Status of one facility under the configured policy
    pub fn status_of(&self, facility: &Facility, today: NaiveDate) -> LifecycleStatus {
        facility.status(today, &self.settings.lifecycle_policy())
    }

    /// Facilities inside `scope` paired with their status
    pub fn classified(
        &self,
        scope: &RecordScope,
        today: NaiveDate,
    ) -> PermitResult<Vec<(Facility, LifecycleStatus)>> {
        let policy = self.settings.lifecycle_policy();
        Ok(self
            .list(scope)?
            .into_iter()
            .map(|f| {
                let status = f.status(today, &policy);
                (f, status)
            })
            .collect())
    }

    /// Selection for export: scope, then optionally a single status
    pub fn filter_for_export(
        &self,
        scope: &RecordScope,
        status: Option<LifecycleStatus>,
        today: NaiveDate,
    ) -> PermitResult<Vec<Facility>> {
        Ok(self
            .classified(scope, today)?
            .into_iter()
            .filter(|(_, s)| status.map_or(true, |wanted| *s == wanted))
            .map(|(f, _)| f)
            .collect())
    }
}
