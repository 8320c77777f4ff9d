//! User settings for Permit Desk
//!
//! Classification rules, the date order used for ambiguous `a/b/yyyy` values,
//! display currency, and the remembered region/office selection.

use serde::{Deserialize, Serialize};

use super::paths::PermitPaths;
use crate::error::PermitError;
use crate::lifecycle::{DateOrder, LifecyclePolicy, UnparseablePolicy, EXPIRY_HORIZON_DAYS};
use crate::models::{OfficeId, RegionId};

/// User settings for Permit Desk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Days ahead of today in which a permit counts as expiring
    #[serde(default = "default_horizon")]
    pub expiry_horizon_days: u32,

    /// Status given to facilities whose expiry date cannot be read
    #[serde(default)]
    pub unparseable_expiry: UnparseablePolicy,

    /// How `a/b/yyyy` dates are read
    #[serde(default)]
    pub date_order: DateOrder,

    /// Currency symbol for amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Region that scopes listings, dashboards and new records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_region: Option<RegionId>,

    /// Office within the selected region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_office: Option<OfficeId>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_horizon() -> u32 {
    EXPIRY_HORIZON_DAYS
}

fn default_currency() -> String {
    "GH₵".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            expiry_horizon_days: default_horizon(),
            unparseable_expiry: UnparseablePolicy::default(),
            date_order: DateOrder::default(),
            currency_symbol: default_currency(),
            selected_region: None,
            selected_office: None,
        }
    }
}

impl Settings {
    /// Classification policy built from these settings
    pub fn lifecycle_policy(&self) -> LifecyclePolicy {
        LifecyclePolicy::new(self.expiry_horizon_days, self.unparseable_expiry)
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PermitPaths) -> Result<Self, PermitError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PermitError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PermitError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PermitPaths) -> Result<(), PermitError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PermitError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PermitError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
