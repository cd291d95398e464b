//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod history;
pub mod maintenance;
pub mod note;
pub mod rental;
pub mod reminder;
pub mod user;
pub mod vehicle;

pub use backup::{handle_backup_command, BackupCommands};
pub use history::{handle_history_command, HistoryCommands};
pub use maintenance::{handle_maintenance_command, MaintenanceCommands};
pub use note::{handle_note_command, NoteCommands};
pub use rental::{handle_rental_command, RentalCommands};
pub use reminder::{handle_reminder_command, ReminderCommands};
pub use user::{handle_user_command, UserCommands};
pub use vehicle::{handle_vehicle_command, VehicleCommands};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::audit::AuditOutcome;
use crate::error::{FleetError, FleetResult};
use crate::models::{UserId, Vehicle};
use crate::services::{UserService, VehicleService};
use crate::storage::Storage;

/// Storage plus the user named on the command line
///
/// The actor is only resolved when a command mutates tracked data, so
/// read-only commands work without `--as`.
pub struct Session<'a> {
    pub storage: &'a Storage,
    actor_name: Option<String>,
}

impl<'a> Session<'a> {
    pub fn new(storage: &'a Storage, actor_name: Option<String>) -> Self {
        Self {
            storage,
            actor_name,
        }
    }

    /// Id of the acting user
    pub fn actor(&self) -> FleetResult<UserId> {
        let name = self.actor_name.as_deref().ok_or_else(|| {
            FleetError::Auth(
                "No acting user. Pass --as <username>, set FLEET_USER, or set default_actor"
                    .into(),
            )
        })?;
        Ok(UserService::new(self.storage).require_actor(name)?.id)
    }

    /// Look up a vehicle by plate or id
    pub fn vehicle(&self, identifier: &str) -> FleetResult<Vehicle> {
        VehicleService::new(self.storage)
            .find(identifier)?
            .ok_or_else(|| FleetError::vehicle_not_found(identifier))
    }
}

/// Warn on stderr when the change went through but was not recorded
pub(crate) fn report_audit(audit: &AuditOutcome) {
    if let Some(error) = audit.failure() {
        eprintln!("Warning: change saved but not recorded in history: {}", error);
    }
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or RFC 3339
pub(crate) fn parse_date(input: &str) -> FleetResult<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(at.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| {
            FleetError::Validation(format!(
                "Invalid date: '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_date_formats() {
        let day = parse_date("2024-12-22").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2024, 12, 22));
        assert_eq!(day.hour(), 0);

        assert_eq!(parse_date("2024-12-22 14:30").unwrap().hour(), 14);
        assert!(parse_date("2024-12-22T10:00:00+02:00").is_ok());
        assert!(parse_date("22/12/2024").is_err());
    }

    #[test]
    fn test_actor_required_for_mutation() {
        let (_temp, storage) = crate::services::testing::create_test_storage();
        let session = Session::new(&storage, None);
        assert!(matches!(session.actor(), Err(FleetError::Auth(_))));

        let session = Session::new(&storage, Some("ghost".into()));
        assert!(session.actor().is_err());
    }
}
