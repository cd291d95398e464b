//! Vehicle repository
//!
//! Manages loading and saving vehicles to vehicles.json

use crate::error::FleetResult;
use crate::models::{Vehicle, VehicleId};

use super::table::{Record, Table};

impl Record for Vehicle {
    type Id = VehicleId;

    fn id(&self) -> VehicleId {
        self.id
    }
}

/// Repository for vehicle persistence
pub type VehicleRepository = Table<Vehicle>;

impl Table<Vehicle> {
    /// Find a vehicle by license plate (case-insensitive)
    pub fn find_by_plate(&self, plate: &str) -> FleetResult<Option<Vehicle>> {
        let plate = plate.trim().to_uppercase();
        self.find(|v| v.license_plate.to_uppercase() == plate)
    }

    /// Vehicle currently holding a parking spot
    pub fn find_by_parking_spot(&self, spot: &str) -> FleetResult<Option<Vehicle>> {
        let spot = spot.trim();
        self.find(|v| v.parking_spot.as_deref() == Some(spot))
    }

    /// Check if a plate is taken by a vehicle other than `exclude_id`
    pub fn plate_taken(&self, plate: &str, exclude_id: Option<VehicleId>) -> FleetResult<bool> {
        Ok(self
            .find_by_plate(plate)?
            .map_or(false, |v| Some(v.id) != exclude_id))
    }

    /// Check if a spot is held by a vehicle other than `exclude_id`
    pub fn spot_taken(&self, spot: &str, exclude_id: Option<VehicleId>) -> FleetResult<bool> {
        Ok(self
            .find_by_parking_spot(spot)?
            .map_or(false, |v| Some(v.id) != exclude_id))
    }
}
