//! Backup system for the fleet manager
//!
//! Rolling backups of every table plus the action history, with a
//! configurable retention policy.
//!
//! # Backup Format
//!
//! Backups are JSON files named `backup-YYYYMMDD-HHMMSS-mmm.json`:
//! - `schema_version`: Version for migration support
//! - `created_at`: Timestamp when the backup was created
//! - one field per table file (`vehicles`, `maintenances`, `rentals`,
//!   `reminders`, `notes`, `users`)
//! - `history`: every change record, oldest first
//!
//! # Retention Policy
//!
//! By default, the system keeps:
//! - 30 daily backups
//! - 12 monthly backups (first backup of each month)

mod manager;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
