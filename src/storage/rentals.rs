//! Rental repository

use crate::error::FleetResult;
use crate::models::{Rental, RentalId, VehicleId};

use super::table::{Record, Table};

impl Record for Rental {
    type Id = RentalId;

    fn id(&self) -> RentalId {
        self.id
    }
}

pub type RentalRepository = Table<Rental>;

impl Table<Rental> {
    /// All rentals ordered by start date, latest first
    pub fn all_by_start(&self) -> FleetResult<Vec<Rental>> {
        let mut rows = self.all()?;
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    pub fn for_vehicle(&self, vehicle_id: VehicleId) -> FleetResult<Vec<Rental>> {
        self.filter(|r| r.vehicle_id == vehicle_id)
    }

    pub fn find_by_booking(&self, booking_id: &str) -> FleetResult<Option<Rental>> {
        let booking_id = booking_id.trim();
        self.find(|r| r.turo_booking_id.as_deref() == Some(booking_id))
    }
}
