//! Note CLI commands

use clap::Subcommand;

use crate::display::format_note_list;
use crate::error::{FleetError, FleetResult};
use crate::models::NoteId;
use crate::services::NoteService;

use super::{report_audit, Session};

/// Note subcommands
#[derive(Subcommand)]
pub enum NoteCommands {
    /// Add a note to a vehicle
    Add {
        /// License plate or ID
        vehicle: String,
        content: String,
    },
    /// List a vehicle's notes, newest first
    List {
        /// License plate or ID
        vehicle: String,
    },
    /// Replace a note's content
    Update { id: String, content: String },
    /// Delete a note
    Delete { id: String },
}

fn parse_note_id(raw: &str) -> FleetResult<NoteId> {
    raw.parse()
        .map_err(|_| FleetError::Validation(format!("Invalid note ID: '{}'", raw)))
}

/// Handle a note command
pub fn handle_note_command(session: &Session, cmd: NoteCommands) -> FleetResult<()> {
    let service = NoteService::new(session.storage);

    match cmd {
        NoteCommands::Add { vehicle, content } => {
            let vehicle = session.vehicle(&vehicle)?;
            let added = service.add(session.actor()?, vehicle.id, &content)?;
            report_audit(&added.audit);
            println!("Added note #{} to {}", added.value.id, vehicle.label());
        }

        NoteCommands::List { vehicle } => {
            let vehicle = session.vehicle(&vehicle)?;
            println!("Notes for {}", vehicle.label());
            print!("{}", format_note_list(&service.list(vehicle.id)?));
        }

        NoteCommands::Update { id, content } => {
            let id = parse_note_id(&id)?;
            let updated = service.update(session.actor()?, id, &content)?;
            report_audit(&updated.audit);
            println!("Updated note #{}", updated.value.id);
        }

        NoteCommands::Delete { id } => {
            let id = parse_note_id(&id)?;
            let deleted = service.delete(session.actor()?, id)?;
            report_audit(&deleted.audit);
            println!("Deleted note #{}", deleted.value.id);
        }
    }

    Ok(())
}
