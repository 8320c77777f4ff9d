//! Record store for Permit Desk
//!
//! JSON files under the data directory stand in for the hosted tables.
//! Writes go through `Storage`, which appends to the audit log and
//! publishes on the change feed.

pub mod events;
pub mod facilities;
pub mod file_io;
pub mod payments;
pub mod regions;

pub use events::{ChangeEvent, ChangeFeed, ChangeKind};
pub use facilities::FacilityRepository;
pub use file_io::{read_json, write_json_atomic};
pub use payments::PaymentRepository;
pub use regions::RegionRepository;

use std::fmt::Display;

use serde::Serialize;

use crate::audit::{diff_records, AuditEntry, AuditLogger, EntityType};
use crate::config::PermitPaths;
use crate::error::PermitError;

pub(crate) fn read_lock_error(e: impl Display) -> PermitError {
    PermitError::Storage(format!("Failed to acquire read lock: {}", e))
}

pub(crate) fn write_lock_error(e: impl Display) -> PermitError {
    PermitError::Storage(format!("Failed to acquire write lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PermitPaths,
    pub facilities: FacilityRepository,
    pub payments: PaymentRepository,
    pub regions: RegionRepository,
    audit: AuditLogger,
    feed: ChangeFeed,
}

impl Storage {
    pub fn new(paths: PermitPaths) -> Result<Self, PermitError> {
        paths.ensure_directories()?;

        Ok(Self {
            facilities: FacilityRepository::new(paths.facilities_file()),
            payments: PaymentRepository::new(paths.payments_file()),
            regions: RegionRepository::new(paths.regions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            feed: ChangeFeed::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &PermitPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn load_all(&mut self) -> Result<(), PermitError> {
        self.facilities.load()?;
        self.payments.load()?;
        self.regions.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), PermitError> {
        self.facilities.save()?;
        self.payments.save()?;
        self.regions.save()?;
        Ok(())
    }

    fn record(&self, entry: AuditEntry) -> Result<(), PermitError> {
        self.audit.log(&entry)?;
        self.feed.publish(ChangeEvent {
            table: entry.entity_type,
            kind: entry.operation.into(),
            id: entry.entity_id,
        });
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), PermitError> {
        self.record(AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), PermitError> {
        let diff = diff_records(before, after);
        self.record(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), PermitError> {
        self.record(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
