//! Rental CLI commands

use clap::Subcommand;

use crate::display::format_rental_list;
use crate::error::{FleetError, FleetResult};
use crate::models::{NewRental, RentalStatus};
use crate::services::RentalService;

use super::{parse_date, Session};

/// Rental subcommands
#[derive(Subcommand)]
pub enum RentalCommands {
    /// Book a vehicle
    Add {
        /// License plate or ID
        vehicle: String,
        /// Start date (YYYY-MM-DD)
        start: String,
        /// End date (YYYY-MM-DD)
        end: String,
        /// Turo booking reference
        #[arg(short, long)]
        booking: Option<String>,
        /// upcoming, active, completed or cancelled
        #[arg(short, long)]
        status: Option<String>,
    },
    /// List rentals, latest start first
    List {
        /// Only this vehicle (plate or ID)
        #[arg(short, long)]
        vehicle: Option<String>,
    },
}

/// Handle a rental command
pub fn handle_rental_command(session: &Session, cmd: RentalCommands) -> FleetResult<()> {
    let service = RentalService::new(session.storage);

    match cmd {
        RentalCommands::Add {
            vehicle,
            start,
            end,
            booking,
            status,
        } => {
            let vehicle = session.vehicle(&vehicle)?;
            let status = status
                .map(|s| s.parse::<RentalStatus>().map_err(FleetError::Validation))
                .transpose()?;

            let rental = service.create(NewRental {
                vehicle_id: vehicle.id,
                start_date: parse_date(&start)?,
                end_date: parse_date(&end)?,
                turo_booking_id: booking,
                status,
            })?;

            println!(
                "Booked {} from {} to {} (#{})",
                vehicle.label(),
                rental.start_date.format("%Y-%m-%d"),
                rental.end_date.format("%Y-%m-%d"),
                rental.id
            );
        }

        RentalCommands::List { vehicle } => {
            let vehicle_id = vehicle.map(|v| session.vehicle(&v)).transpose()?.map(|v| v.id);
            print!("{}", format_rental_list(&service.list(vehicle_id)?));
        }
    }

    Ok(())
}
