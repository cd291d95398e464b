//! Backup listing

use chrono::{DateTime, Utc};

use crate::backup::BackupInfo;

/// Table of backups with size and age relative to `now`
pub fn format_backup_list(backups: &[BackupInfo], now: DateTime<Utc>) -> String {
    if backups.is_empty() {
        return "No backups found.\nCreate one with: fleet backup create\n".to_string();
    }

    let name_width = backups.iter().map(|b| b.filename.len()).max().unwrap_or(8).max(8);

    let mut output = format!(
        "{:<name_width$}  {:>9}  {:>5}\n",
        "Filename",
        "Size",
        "Age",
        name_width = name_width
    );
    for backup in backups {
        output.push_str(&format!(
            "{:<name_width$}  {:>9}  {:>5}{}\n",
            backup.filename,
            human_size(backup.size_bytes),
            human_age(now.signed_duration_since(backup.created_at)),
            if backup.is_monthly { "  monthly" } else { "" },
            name_width = name_width
        ));
    }
    output.push_str(&format!("{} backup(s)\n", backups.len()));
    output
}

fn human_age(age: chrono::Duration) -> String {
    let units = [(86_400 * 30, "mo"), (86_400, "d"), (3_600, "h"), (60, "m")];
    let seconds = age.num_seconds().max(0);
    units
        .iter()
        .find(|(size, _)| seconds >= *size)
        .map(|(size, unit)| format!("{}{}", seconds / size, unit))
        .unwrap_or_else(|| format!("{}s", seconds))
}

fn human_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1 << 20 => format!("{:.1} MB", b as f64 / (1u64 << 20) as f64),
        b if b >= 1 << 10 => format!("{:.1} KB", b as f64 / (1u64 << 10) as f64),
        b => format!("{} B", b),
    }
}
