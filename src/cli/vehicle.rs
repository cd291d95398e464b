//! Vehicle CLI commands
//!
//! Implements CLI commands for fleet vehicle management.

use clap::Subcommand;

use crate::audit::AuditOutcome;
use crate::display::{format_removal, format_vehicle_details, format_vehicle_list};
use crate::error::{FleetError, FleetResult};
use crate::models::{NewVehicle, VehicleStatus, VehicleUpdate};
use crate::services::VehicleService;

use super::{report_audit, Session};

/// Vehicle subcommands
#[derive(Subcommand)]
pub enum VehicleCommands {
    /// Register a vehicle
    Add {
        brand: String,
        model: String,
        year: i32,
        /// License plate (unique)
        plate: String,
        /// Initial status (available, rented, maintenance, needs_repair, needs_cleaning)
        #[arg(short, long)]
        status: Option<String>,
        /// Assigned parking spot
        #[arg(short = 'p', long)]
        spot: Option<String>,
        /// Daily rental rate
        #[arg(short = 'r', long)]
        rate: Option<f64>,
    },
    /// List vehicles
    List {
        /// Only vehicles with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show vehicle details
    Show {
        /// License plate or ID
        vehicle: String,
    },
    /// Update a vehicle
    Update {
        /// License plate or ID
        vehicle: String,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// New license plate
        #[arg(long)]
        plate: Option<String>,
        #[arg(short, long)]
        status: Option<String>,
        /// New parking spot
        #[arg(short = 'p', long, conflicts_with = "clear_spot")]
        spot: Option<String>,
        /// Release the parking spot
        #[arg(long)]
        clear_spot: bool,
        /// New daily rental rate
        #[arg(short = 'r', long, conflicts_with = "clear_rate")]
        rate: Option<f64>,
        /// Remove the daily rate
        #[arg(long)]
        clear_rate: bool,
    },
    /// Delete a vehicle with its maintenance, rentals, reminders and notes
    Delete {
        /// License plate or ID
        vehicle: String,
    },
}

fn parse_status(status: Option<String>) -> FleetResult<Option<VehicleStatus>> {
    status
        .map(|s| s.parse::<VehicleStatus>().map_err(FleetError::Validation))
        .transpose()
}

/// Handle a vehicle command
pub fn handle_vehicle_command(session: &Session, cmd: VehicleCommands) -> FleetResult<()> {
    let service = VehicleService::new(session.storage);

    match cmd {
        VehicleCommands::Add {
            brand,
            model,
            year,
            plate,
            status,
            spot,
            rate,
        } => {
            let input = NewVehicle {
                brand,
                model,
                year,
                license_plate: plate,
                status: parse_status(status)?,
                parking_spot: spot,
                daily_rate: rate,
            };

            let created = service.create(session.actor()?, input)?;
            report_audit(&created.audit);

            let vehicle = created.value;
            println!("Added vehicle: {}", vehicle.label());
            println!("  Status: {}", vehicle.status);
            println!("  ID: {}", vehicle.id);
        }

        VehicleCommands::List { status } => {
            let vehicles = service.list(parse_status(status)?)?;
            print!("{}", format_vehicle_list(&vehicles));
        }

        VehicleCommands::Show { vehicle } => {
            let found = session.vehicle(&vehicle)?;
            print!("{}", format_vehicle_details(&found));
        }

        VehicleCommands::Update {
            vehicle,
            brand,
            model,
            year,
            plate,
            status,
            spot,
            clear_spot,
            rate,
            clear_rate,
        } => {
            let found = session.vehicle(&vehicle)?;

            let update = VehicleUpdate {
                brand,
                model,
                year,
                license_plate: plate,
                status: parse_status(status)?,
                parking_spot: if clear_spot { Some(None) } else { spot.map(Some) },
                daily_rate: if clear_rate { Some(None) } else { rate.map(Some) },
            };

            if update.is_empty() {
                println!("No changes specified. Use --help to see the fields you can update.");
                return Ok(());
            }

            let updated = service.update(session.actor()?, found.id, update)?;
            report_audit(&updated.audit);

            if updated.audit == AuditOutcome::Unchanged {
                println!("Nothing changed for {}", updated.value.label());
            } else {
                println!("Updated vehicle: {}", updated.value.label());
            }
        }

        VehicleCommands::Delete { vehicle } => {
            let found = session.vehicle(&vehicle)?;
            let removed = service.delete(session.actor()?, found.id)?;
            report_audit(&removed.audit);
            print!("{}", format_removal(&removed.value));
        }
    }

    Ok(())
}
