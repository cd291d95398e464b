//! Reminder CLI commands

use clap::Subcommand;

use crate::display::format_reminder_list;
use crate::error::{FleetError, FleetResult};
use crate::models::ReminderId;
use crate::services::ReminderService;

use super::{parse_date, Session};

/// Reminder subcommands
#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Add a reminder for a vehicle
    Add {
        /// License plate or ID
        vehicle: String,
        /// Kind, e.g. "cleaning" or "insurance"
        kind: String,
        /// Due date (YYYY-MM-DD)
        due: String,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List reminders (pending only unless --all)
    List {
        #[arg(short, long)]
        all: bool,
    },
    /// Mark a reminder as done
    Complete { id: String },
}

/// Handle a reminder command
pub fn handle_reminder_command(session: &Session, cmd: ReminderCommands) -> FleetResult<()> {
    let service = ReminderService::new(session.storage);

    match cmd {
        ReminderCommands::Add {
            vehicle,
            kind,
            due,
            description,
        } => {
            let vehicle = session.vehicle(&vehicle)?;
            let reminder = service.create(vehicle.id, &kind, description, parse_date(&due)?)?;
            println!(
                "Reminder #{}: {} for {} due {}",
                reminder.id,
                reminder.kind,
                vehicle.label(),
                reminder.due_date.format("%Y-%m-%d")
            );
        }

        ReminderCommands::List { all } => {
            let reminders = if all {
                service.list_all()?
            } else {
                service.list_pending()?
            };
            print!("{}", format_reminder_list(&reminders));
        }

        ReminderCommands::Complete { id } => {
            let id: ReminderId = id
                .parse()
                .map_err(|_| FleetError::Validation(format!("Invalid reminder ID: '{}'", id)))?;
            let reminder = service.complete(id)?;
            println!("Completed reminder #{}: {}", reminder.id, reminder.kind);
        }
    }

    Ok(())
}
