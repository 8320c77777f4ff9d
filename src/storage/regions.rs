//! Region and office repository
//!
//! Both live in regions.json since offices are meaningless without their
//! region.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PermitError;
use crate::models::{Office, OfficeId, Region, RegionId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RegionData {
    regions: Vec<Region>,
    #[serde(default)]
    offices: Vec<Office>,
}

pub struct RegionRepository {
    path: PathBuf,
    regions: RwLock<HashMap<RegionId, Region>>,
    offices: RwLock<HashMap<OfficeId, Office>>,
}

impl RegionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            regions: RwLock::new(HashMap::new()),
            offices: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), PermitError> {
        let file_data: RegionData = read_json(&self.path)?;

        let mut regions = self.regions.write().map_err(write_lock_error)?;
        let mut offices = self.offices.write().map_err(write_lock_error)?;

        *regions = file_data.regions.into_iter().map(|r| (r.id, r)).collect();
        *offices = file_data.offices.into_iter().map(|o| (o.id, o)).collect();
        Ok(())
    }

    pub fn save(&self) -> Result<(), PermitError> {
        let file_data = RegionData {
            regions: self.get_all_regions()?,
            offices: self.get_all_offices()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get_region(&self, id: RegionId) -> Result<Option<Region>, PermitError> {
        let regions = self.regions.read().map_err(read_lock_error)?;
        Ok(regions.get(&id).cloned())
    }

    pub fn get_office(&self, id: OfficeId) -> Result<Option<Office>, PermitError> {
        let offices = self.offices.read().map_err(read_lock_error)?;
        Ok(offices.get(&id).cloned())
    }

    /// Regions sorted by name
    pub fn get_all_regions(&self) -> Result<Vec<Region>, PermitError> {
        let regions = self.regions.read().map_err(read_lock_error)?;
        let mut all: Vec<_> = regions.values().cloned().collect();
        all.sort_by_key(|r| r.name.to_lowercase());
        Ok(all)
    }

    /// Offices sorted by name
    pub fn get_all_offices(&self) -> Result<Vec<Office>, PermitError> {
        let offices = self.offices.read().map_err(read_lock_error)?;
        let mut all: Vec<_> = offices.values().cloned().collect();
        all.sort_by_key(|o| o.name.to_lowercase());
        Ok(all)
    }

    pub fn offices_for_region(&self, region_id: RegionId) -> Result<Vec<Office>, PermitError> {
        Ok(self
            .get_all_offices()?
            .into_iter()
            .filter(|o| o.region_id == region_id)
            .collect())
    }

    pub fn upsert_region(&self, region: Region) -> Result<(), PermitError> {
        let mut regions = self.regions.write().map_err(write_lock_error)?;
        regions.insert(region.id, region);
        Ok(())
    }

    pub fn upsert_office(&self, office: Office) -> Result<(), PermitError> {
        let mut offices = self.offices.write().map_err(write_lock_error)?;
        offices.insert(office.id, office);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, RegionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = RegionRepository::new(temp_dir.path().join("regions.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_offices_for_region() {
        let (_temp_dir, repo) = create_test_repo();
        let accra = Region::new("Greater Accra", "GAR");
        let ashanti = Region::new("Ashanti", "ASH");
        repo.upsert_office(Office::new(accra.id, "Tema")).unwrap();
        repo.upsert_office(Office::new(accra.id, "Accra Central")).unwrap();
        repo.upsert_office(Office::new(ashanti.id, "Kumasi")).unwrap();

        let names: Vec<_> = repo
            .offices_for_region(accra.id)
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, ["Accra Central", "Tema"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let region = Region::new("Volta", "VR");
        let office = Office::new(region.id, "Ho");
        repo.upsert_region(region.clone()).unwrap();
        repo.upsert_office(office.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = RegionRepository::new(temp_dir.path().join("regions.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_region(region.id).unwrap(), Some(region));
        assert_eq!(reloaded.get_office(office.id).unwrap(), Some(office));
    }
}
