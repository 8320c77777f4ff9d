//! Region and office models
//!
//! Two-level administrative partition. An office belongs to exactly one
//! region; both are only used to scope facility and payment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{OfficeId, RegionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,

    pub name: String,

    /// Short code, e.g. "GAR"
    #[serde(default)]
    pub code: String,

    pub created_at: DateTime<Utc>,
}

impl Region {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: RegionId::new(),
            name: name.into(),
            code: code.into().trim().to_uppercase(),
            created_at: Utc::now(),
        }
    }

    /// Whether `identifier` is this region's id, name or code
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.id.matches(identifier)
            || self.name.eq_ignore_ascii_case(identifier)
            || (!self.code.is_empty() && self.code.eq_ignore_ascii_case(identifier))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Region name is required".into());
        }
        Ok(())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    pub id: OfficeId,

    pub region_id: RegionId,

    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl Office {
    pub fn new(region_id: RegionId, name: impl Into<String>) -> Self {
        Self {
            id: OfficeId::new(),
            region_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        self.id.matches(identifier) || self.name.eq_ignore_ascii_case(identifier)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Office name is required".into());
        }
        Ok(())
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
