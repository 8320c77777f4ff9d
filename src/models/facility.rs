//! Facility model
//!
//! A permitted business location. Dates are stored as text: `DD/MM/YYYY`
//! when the entered value could be read, otherwise the value as entered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{FacilityId, OfficeId, RegionId};
use crate::lifecycle::{parse_date, LifecyclePolicy, LifecycleStatus, ParsedDate};

const MAX_NAME_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,

    pub name: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub district: String,

    /// Canonical sector name (see `normalize::normalize_sector`)
    #[serde(default)]
    pub sector: Option<String>,

    /// Physical file reference in the office archive
    #[serde(default)]
    pub file_location_id: String,

    #[serde(default)]
    pub effective_date: Option<String>,

    /// No expiry date means the permit does not lapse
    #[serde(default)]
    pub expiry_date: Option<String>,

    #[serde(default)]
    pub region_id: Option<RegionId>,

    #[serde(default)]
    pub office_id: Option<OfficeId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Facility {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: FacilityId::new(),
            name: name.into(),
            location: String::new(),
            district: String::new(),
            sector: None,
            file_location_id: String::new(),
            effective_date: None,
            expiry_date: None,
            region_id: None,
            office_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored expiry date; stored text is always day-first
    pub fn expiry(&self) -> ParsedDate {
        parse_date(self.expiry_date.as_deref())
    }

    pub fn effective(&self) -> ParsedDate {
        parse_date(self.effective_date.as_deref())
    }

    /// Permit status on `today`
    pub fn status(&self, today: NaiveDate, policy: &LifecyclePolicy) -> LifecycleStatus {
        policy.classify(today, &self.expiry())
    }

    /// Case-insensitive substring match over name, sector, location and district
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            Some(self.name.as_str()),
            self.sector.as_deref(),
            Some(self.location.as_str()),
            Some(self.district.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    pub fn validate(&self) -> Result<(), FacilityValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FacilityValidationError::EmptyName);
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(FacilityValidationError::NameTooLong(name.chars().count()));
        }

        Ok(())
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl FacilityValidationError {
    /// Record field the error refers to
    pub fn field(&self) -> &'static str {
        "name"
    }
}

impl fmt::Display for FacilityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Facility name is required"),
            Self::NameTooLong(len) => write!(
                f,
                "Facility name too long ({} chars, max {})",
                len, MAX_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for FacilityValidationError {}
