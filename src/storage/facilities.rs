//! Facility repository for JSON storage
//!
//! Manages loading and saving facilities to facilities.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PermitError;
use crate::models::{Facility, FacilityId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct FacilityData {
    facilities: Vec<Facility>,
}

/// Folded key for the name index
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub struct FacilityRepository {
    path: PathBuf,
    data: RwLock<HashMap<FacilityId, Facility>>,
    /// Index: folded name -> facility_id
    by_name: RwLock<HashMap<String, FacilityId>>,
}

impl FacilityRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), PermitError> {
        let file_data: FacilityData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_name = self.by_name.write().map_err(write_lock_error)?;

        data.clear();
        by_name.clear();

        for facility in file_data.facilities {
            by_name.insert(name_key(&facility.name), facility.id);
            data.insert(facility.id, facility);
        }

        tracing::debug!(count = data.len(), "facilities loaded");
        Ok(())
    }

    pub fn save(&self) -> Result<(), PermitError> {
        let facilities = self.get_all()?;
        write_json_atomic(&self.path, &FacilityData { facilities })
    }

    pub fn get(&self, id: FacilityId) -> Result<Option<Facility>, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Facility by name, ignoring case and surrounding whitespace
    pub fn get_by_name(&self, name: &str) -> Result<Option<Facility>, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let by_name = self.by_name.read().map_err(read_lock_error)?;

        Ok(by_name
            .get(&name_key(name))
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// All facilities, newest first
    pub fn get_all(&self) -> Result<Vec<Facility>, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut facilities: Vec<_> = data.values().cloned().collect();
        facilities.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(facilities)
    }

    /// Insert or replace a facility, keeping the name index current
    pub fn upsert(&self, facility: Facility) -> Result<(), PermitError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_name = self.by_name.write().map_err(write_lock_error)?;

        if let Some(old) = data.get(&facility.id) {
            by_name.remove(&name_key(&old.name));
        }
        by_name.insert(name_key(&facility.name), facility.id);
        data.insert(facility.id, facility);
        Ok(())
    }

    pub fn delete(&self, id: FacilityId) -> Result<Option<Facility>, PermitError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut by_name = self.by_name.write().map_err(write_lock_error)?;

        let removed = data.remove(&id);
        if let Some(facility) = &removed {
            by_name.remove(&name_key(&facility.name));
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, FacilityRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = FacilityRepository::new(temp_dir.path().join("facilities.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_by_name_ignores_case() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Facility::new("Acme Quarry")).unwrap();

        let found = repo.get_by_name("  acme QUARRY ").unwrap();
        assert_eq!(found.unwrap().name, "Acme Quarry");
        assert!(repo.get_by_name("Other").unwrap().is_none());
    }

    #[test]
    fn test_rename_updates_index() {
        let (_temp_dir, repo) = create_test_repo();
        let mut facility = Facility::new("Old Name");
        repo.upsert(facility.clone()).unwrap();

        facility.name = "New Name".into();
        repo.upsert(facility).unwrap();

        assert!(repo.get_by_name("Old Name").unwrap().is_none());
        assert!(repo.get_by_name("New Name").unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let mut older = Facility::new("Older");
        older.created_at -= Duration::days(2);
        repo.upsert(older).unwrap();
        repo.upsert(Facility::new("Newer")).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["Newer", "Older"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let mut facility = Facility::new("Acme Quarry");
        facility.expiry_date = Some("31/12/2025".into());
        let id = facility.id;
        repo.upsert(facility).unwrap();
        repo.save().unwrap();

        let reloaded = FacilityRepository::new(temp_dir.path().join("facilities.json"));
        reloaded.load().unwrap();
        let facility = reloaded.get(id).unwrap().unwrap();
        assert_eq!(facility.expiry_date.as_deref(), Some("31/12/2025"));
        assert!(reloaded.get_by_name("acme quarry").unwrap().is_some());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let facility = Facility::new("Acme Quarry");
        let id = facility.id;
        repo.upsert(facility).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert!(repo.get_by_name("Acme Quarry").unwrap().is_none());
    }
}
