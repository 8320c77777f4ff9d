//! Path management for Permit Desk
//!
//! ## Path Resolution Order
//!
//! 1. `PERMIT_DESK_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory for `permit-desk`
//!    (`~/.config/permit-desk` on Linux, `%APPDATA%\permit-desk` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PermitError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PERMIT_DESK_DATA_DIR";

/// Manages all paths used by Permit Desk
#[derive(Debug, Clone)]
pub struct PermitPaths {
    /// Base directory for all Permit Desk data
    base_dir: PathBuf,
}

impl PermitPaths {
    /// Create a new PermitPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PermitError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PermitPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Record store directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn facilities_file(&self) -> PathBuf {
        self.data_dir().join("facilities.json")
    }

    pub fn payments_file(&self) -> PathBuf {
        self.data_dir().join("payments.json")
    }

    /// Regions and their offices
    pub fn regions_file(&self) -> PathBuf {
        self.data_dir().join("regions.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), PermitError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PermitError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PermitError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, PermitError> {
    ProjectDirs::from("", "", "permit-desk")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| PermitError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PermitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PermitPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PermitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.facilities_file(),
            temp_dir.path().join("data").join("facilities.json")
        );
        assert_eq!(
            paths.regions_file(),
            temp_dir.path().join("data").join("regions.json")
        );
    }
}
