//! Path management for the fleet manager
//!
//! ## Path Resolution Order
//!
//! 1. `FLEET_DATA_DIR` environment variable (if set)
//! 2. The platform config directory joined with `fleet-manager`
//!    (`~/.config/fleet-manager` on Linux, `%APPDATA%\fleet-manager` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::FleetError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FLEET_DATA_DIR";

/// Manages all paths used by the fleet manager
#[derive(Debug, Clone)]
pub struct FleetPaths {
    base_dir: PathBuf,
}

impl FleetPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, FleetError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create FleetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn vehicles_file(&self) -> PathBuf {
        self.data_dir().join("vehicles.json")
    }

    pub fn maintenances_file(&self) -> PathBuf {
        self.data_dir().join("maintenances.json")
    }

    pub fn rentals_file(&self) -> PathBuf {
        self.data_dir().join("rentals.json")
    }

    pub fn reminders_file(&self) -> PathBuf {
        self.data_dir().join("reminders.json")
    }

    pub fn notes_file(&self) -> PathBuf {
        self.data_dir().join("notes.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Append-only action history (one JSON record per line)
    pub fn history_file(&self) -> PathBuf {
        self.data_dir().join("history.jsonl")
    }

    /// High-water mark of assigned history ids, survives history clears
    pub fn history_seq_file(&self) -> PathBuf {
        self.data_dir().join("history.seq")
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), FleetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FleetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FleetError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| FleetError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if the fleet store has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, FleetError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| FleetError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("fleet-manager"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.backup_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.vehicles_file(),
            temp_dir.path().join("data").join("vehicles.json")
        );
        assert_eq!(
            paths.history_file(),
            temp_dir.path().join("data").join("history.jsonl")
        );
    }
}
