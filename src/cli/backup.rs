//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use chrono::Utc;
use clap::Subcommand;

use crate::backup::BackupManager;
use crate::config::paths::FleetPaths;
use crate::config::settings::Settings;
use crate::display::format_backup_list;
use crate::error::FleetResult;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup and apply the retention policy
    Create,

    /// List all available backups, newest first
    List,

    /// Delete old backups according to retention policy
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &FleetPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> FleetResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, deleted) = manager.create_backup_with_retention()?;
            let filename = backup_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| backup_path.display().to_string());
            println!("Backup created: {}", filename);
            println!("Location: {}", backup_path.display());
            if !deleted.is_empty() {
                println!("Removed {} expired backup(s)", deleted.len());
            }
        }

        BackupCommands::List => {
            print!("{}", format_backup_list(&manager.list_backups()?, Utc::now()));
        }

        BackupCommands::Prune => {
            let deleted = manager.enforce_retention()?;
            if deleted.is_empty() {
                println!("No backups to prune.");
            } else {
                println!("Removed {} expired backup(s)", deleted.len());
            }
        }
    }

    Ok(())
}
