//! Rental service
//!
//! Rentals are not part of the action history.

use tracing::info;

use crate::error::{FleetError, FleetResult};
use crate::models::{NewRental, Rental, VehicleId};
use crate::storage::Storage;

pub struct RentalService<'a> {
    storage: &'a Storage,
}

impl<'a> RentalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All rentals, latest start first, optionally for one vehicle
    pub fn list(&self, vehicle_id: Option<VehicleId>) -> FleetResult<Vec<Rental>> {
        let mut rentals = self.storage.rentals.all_by_start()?;
        if let Some(vehicle_id) = vehicle_id {
            rentals.retain(|r| r.vehicle_id == vehicle_id);
        }
        Ok(rentals)
    }

    /// Book a vehicle
    pub fn create(&self, input: NewRental) -> FleetResult<Rental> {
        if !self.storage.vehicles.exists(input.vehicle_id)? {
            return Err(FleetError::vehicle_not_found(input.vehicle_id.to_string()));
        }

        if let Some(booking) = input.turo_booking_id.as_deref() {
            if !booking.trim().is_empty() && self.storage.rentals.find_by_booking(booking)?.is_some() {
                return Err(FleetError::Duplicate {
                    entity_type: "Rental",
                    identifier: booking.trim().to_string(),
                });
            }
        }

        let rental = self.storage.rentals.insert_with(|id| {
            let rental = Rental::from_new(id, input);
            rental.validate().map_err(FleetError::Validation)?;
            Ok(rental)
        })?;
        self.storage.rentals.save()?;

        info!(rental = %rental.id, vehicle = %rental.vehicle_id, "rental created");
        Ok(rental)
    }
}
