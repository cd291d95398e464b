//! Maintenance CLI commands

use clap::Subcommand;
use serde_json::{Map, Value};

use crate::display::format_maintenance_list;
use crate::error::{FleetError, FleetResult};
use crate::models::{MaintenanceId, MaintenanceStatus, NewMaintenance};
use crate::services::MaintenanceService;

use super::{parse_date, report_audit, Session};

/// Maintenance subcommands
#[derive(Subcommand)]
pub enum MaintenanceCommands {
    /// Schedule maintenance for a vehicle
    Add {
        /// License plate or ID
        vehicle: String,
        /// Kind of work, e.g. "oil change"
        kind: String,
        /// Date (YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// scheduled, in_progress or completed
        #[arg(short, long)]
        status: Option<String>,
    },
    /// List maintenance, newest first
    List {
        /// Only this vehicle (plate or ID)
        #[arg(short, long)]
        vehicle: Option<String>,
    },
    /// Update a maintenance record
    Update {
        id: String,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
    },
}

fn parse_status(status: Option<String>) -> FleetResult<Option<MaintenanceStatus>> {
    status
        .map(|s| s.parse::<MaintenanceStatus>().map_err(FleetError::Validation))
        .transpose()
}

/// Handle a maintenance command
pub fn handle_maintenance_command(session: &Session, cmd: MaintenanceCommands) -> FleetResult<()> {
    let service = MaintenanceService::new(session.storage);

    match cmd {
        MaintenanceCommands::Add {
            vehicle,
            kind,
            date,
            description,
            status,
        } => {
            let vehicle = session.vehicle(&vehicle)?;
            let input = NewMaintenance {
                vehicle_id: vehicle.id,
                kind,
                description,
                date: match date {
                    Some(date) => parse_date(&date)?,
                    None => chrono::Utc::now(),
                },
                status: parse_status(status)?,
            };

            let created = service.create(session.actor()?, input)?;
            report_audit(&created.audit);
            println!(
                "Scheduled {} for {} on {} (#{})",
                created.value.kind,
                vehicle.label(),
                created.value.date.format("%Y-%m-%d"),
                created.value.id
            );
        }

        MaintenanceCommands::List { vehicle } => {
            let vehicle_id = vehicle.map(|v| session.vehicle(&v)).transpose()?.map(|v| v.id);
            print!("{}", format_maintenance_list(&service.list(vehicle_id)?));
        }

        MaintenanceCommands::Update {
            id,
            kind,
            date,
            description,
            status,
        } => {
            let id: MaintenanceId = id
                .parse()
                .map_err(|_| FleetError::Validation(format!("Invalid maintenance ID: '{}'", id)))?;

            let mut patch = Map::new();
            if let Some(kind) = kind {
                patch.insert("type".into(), Value::String(kind));
            }
            if let Some(date) = date {
                patch.insert("date".into(), serde_json::to_value(parse_date(&date)?)?);
            }
            if let Some(description) = description {
                patch.insert("description".into(), Value::String(description));
            }
            if let Some(status) = parse_status(status)? {
                patch.insert("status".into(), serde_json::to_value(status)?);
            }

            if patch.is_empty() {
                println!("No changes specified. Use --help to see the fields you can update.");
                return Ok(());
            }

            let updated = service.update(session.actor()?, id, &Value::Object(patch))?;
            report_audit(&updated.audit);
            println!("Updated maintenance #{}", updated.value.id);
        }
    }

    Ok(())
}
