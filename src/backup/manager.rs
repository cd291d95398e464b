//! Backup manager
//!
//! Handles rolling backups with configurable retention policies.
//! Backups are stored as dated JSON archives.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::audit::ChangeRecord;
use crate::config::paths::FleetPaths;
use crate::config::settings::BackupRetention;
use crate::error::{FleetError, FleetResult};
use crate::storage::file_io::read_json_lines;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Taken on the first of a month, counted against the monthly quota
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub vehicles: Value,
    pub maintenances: Value,
    pub rentals: Value,
    pub reminders: Value,
    pub notes: Value,
    pub users: Value,
    /// Action history, oldest first
    pub history: Vec<ChangeRecord>,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: FleetPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: FleetPaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    /// Create a backup of all data
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> FleetResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| FleetError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = self.create_archive(now)?;

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| FleetError::Json(format!("Failed to serialize backup: {}", e)))?;

        fs::write(&backup_path, json)
            .map_err(|e| FleetError::Io(format!("Failed to write backup file: {}", e)))?;

        info!(
            file = %filename,
            history_records = archive.history.len(),
            "backup created"
        );
        Ok(backup_path)
    }

    fn create_archive(&self, timestamp: DateTime<Utc>) -> FleetResult<BackupArchive> {
        Ok(BackupArchive {
            schema_version: 1,
            created_at: timestamp,
            vehicles: read_json_value(&self.paths.vehicles_file())?,
            maintenances: read_json_value(&self.paths.maintenances_file())?,
            rentals: read_json_value(&self.paths.rentals_file())?,
            reminders: read_json_value(&self.paths.reminders_file())?,
            notes: read_json_value(&self.paths.notes_file())?,
            users: read_json_value(&self.paths.users_file())?,
            history: read_json_lines(self.paths.history_file())?,
        })
    }

    /// List all available backups, newest first
    ///
    /// Files that don't follow the backup naming scheme are ignored.
    pub fn list_backups(&self) -> FleetResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| FleetError::Io(format!("Failed to read backup directory: {}", e)))?;

        let mut backups = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| FleetError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();
            backups.extend(parse_backup_info(&path));
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Enforce retention policy by deleting old backups
    pub fn enforce_retention(&self) -> FleetResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        let (monthly, daily): (Vec<_>, Vec<_>) = backups.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| FleetError::Io(format!("Failed to delete old backup: {}", e)))?;
            debug!(file = %backup.filename, "expired backup removed");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(&self) -> FleetResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    pub fn get_latest_backup(&self) -> FleetResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    if path.extension()? != "json" {
        return None;
    }
    let filename = path.file_name()?.to_str()?.to_string();
    let created_at = filename
        .strip_prefix("backup-")
        .and_then(|rest| rest.strip_suffix(".json"))
        .and_then(parse_backup_timestamp)?;

    Some(BackupInfo {
        size_bytes: fs::metadata(path).ok()?.len(),
        path: path.to_path_buf(),
        is_monthly: created_at.day() == 1,
        created_at,
        filename,
    })
}

/// Read a JSON file as a generic Value, empty object if the file doesn't exist
fn read_json_value(path: &Path) -> FleetResult<Value> {
    if !path.exists() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| FleetError::Io(format!("Failed to read file for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| FleetError::Json(format!("Failed to parse JSON for backup: {}", e)))
}

/// Parse `YYYYMMDD-HHMMSS[-mmm]`
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let (seconds, millis) = match stamp.len() {
        15 => (stamp, 0),
        19 => (&stamp[..15], stamp.get(16..)?.parse::<i64>().ok()?),
        _ => return None,
    };

    let at = NaiveDateTime::parse_from_str(seconds, "%Y%m%d-%H%M%S").ok()?;
    Some(at.and_utc() + Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{ActionKind, ChangeLedger, EntityType, JsonlLedger, NewChangeRecord};
    use crate::models::UserId;
    use crate::storage::initialize_storage;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let retention = BackupRetention {
            daily_count: 3,
            monthly_count: 2,
        };

        (BackupManager::new(paths, retention), temp_dir)
    }

    #[test]
    fn test_create_backup() {
        let (manager, _temp) = create_test_manager();

        let backup_path = manager.create_backup().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path.to_string_lossy().contains("backup-"));
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _temp) = create_test_manager();

        manager.create_backup().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));
        manager.create_backup().unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].created_at >= backups[1].created_at);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager();

        for _ in 0..5 {
            manager.create_backup().unwrap();
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        // Backups taken on the 1st fall under the monthly quota
        let kept = if Utc::now().day() == 1 { 2 } else { 3 };
        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 5 - kept);
        assert_eq!(manager.list_backups().unwrap().len(), kept);
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager();
        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup().unwrap();
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, path);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20241222-002844").unwrap();
        assert_eq!(timestamp.year(), 2024);
        assert_eq!(timestamp.month(), 12);
        assert_eq!(timestamp.day(), 22);

        let with_millis = parse_backup_timestamp("20241222-002844-456").unwrap();
        assert_eq!(with_millis.timestamp_subsec_millis(), 456);
        assert!(parse_backup_timestamp("20241222").is_none());
        assert!(parse_backup_timestamp("2024122-002844").is_none());
        assert!(parse_backup_timestamp("20241322-002844").is_none());
    }

    #[test]
    fn test_archive_contains_tables_and_history() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths, true).unwrap();

        JsonlLedger::new(paths.history_file(), paths.history_seq_file())
            .append(NewChangeRecord::new(
                UserId::new(1),
                ActionKind::Create,
                EntityType::Vehicle,
                1,
                json!({"brand": "Tesla"}),
            ))
            .unwrap();

        let manager = BackupManager::new(paths, BackupRetention::default());
        let backup_path = manager.create_backup().unwrap();

        let contents = fs::read_to_string(&backup_path).unwrap();
        let archive: BackupArchive = serde_json::from_str(&contents).unwrap();

        assert_eq!(archive.schema_version, 1);
        assert_eq!(archive.vehicles["rows"].as_array().unwrap().len(), 5);
        assert!(archive.users.is_object());
        assert_eq!(archive.history.len(), 1);
    }
}
