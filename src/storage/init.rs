//! Storage initialization
//!
//! Handles first-run setup and the optional demo fleet

use chrono::{Duration, Utc};
use tracing::info;

use crate::config::paths::FleetPaths;
use crate::config::settings::Settings;
use crate::error::FleetResult;
use crate::models::{
    Maintenance, MaintenanceStatus, NewMaintenance, NewRental, NewVehicle, Note, Reminder, Rental,
    RentalStatus, Vehicle, VehicleStatus,
};

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Creates the directory layout and a default `config.json`. With `seed`,
/// an empty fleet is filled with demo data. Returns whether demo data was
/// written.
pub fn initialize_storage(paths: &FleetPaths, seed: bool) -> FleetResult<bool> {
    paths.ensure_directories()?;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    if !seed {
        return Ok(false);
    }

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if storage.vehicles.count()? > 0 {
        info!("fleet already has vehicles, skipping demo data");
        return Ok(false);
    }

    seed_demo_fleet(&storage)?;
    storage.save_all()?;
    Ok(true)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FleetPaths) -> bool {
    !paths.is_initialized()
}

/// Demo vehicles: brand, model, year, plate, status, spot, daily rate
const DEMO_VEHICLES: [(&str, &str, i32, &str, VehicleStatus, &str, f64); 5] = [
    ("Tesla", "Model 3", 2023, "ABC123", VehicleStatus::Available, "A1", 89.99),
    ("BMW", "X5", 2022, "XYZ789", VehicleStatus::Rented, "B2", 129.99),
    ("Mercedes", "C300", 2023, "DEF456", VehicleStatus::Maintenance, "C3", 99.99),
    ("Porsche", "911", 2022, "GHI789", VehicleStatus::NeedsRepair, "D4", 199.99),
    ("Audi", "Q7", 2023, "JKL012", VehicleStatus::NeedsCleaning, "E5", 149.99),
];

fn seed_demo_fleet(storage: &Storage) -> FleetResult<()> {
    let now = Utc::now();

    let mut vehicles = Vec::new();
    for (brand, model, year, plate, status, spot, rate) in DEMO_VEHICLES {
        let vehicle = storage.vehicles.insert_with(|id| {
            Ok(Vehicle::from_new(
                id,
                NewVehicle {
                    brand: brand.into(),
                    model: model.into(),
                    year,
                    license_plate: plate.into(),
                    status: Some(status),
                    parking_spot: Some(spot.into()),
                    daily_rate: Some(rate),
                },
            ))
        })?;
        vehicles.push(vehicle.id);
    }

    let maintenances = [
        (vehicles[2], "Service", "30,000 km service", 7),
        (vehicles[3], "Repair", "Replace brake pads", 2),
    ];
    for (vehicle_id, kind, description, days) in maintenances {
        storage.maintenances.insert_with(|id| {
            Ok(Maintenance::from_new(
                id,
                NewMaintenance {
                    vehicle_id,
                    kind: kind.into(),
                    description: Some(description.into()),
                    date: now + Duration::days(days),
                    status: Some(MaintenanceStatus::Scheduled),
                },
            ))
        })?;
    }

    let rentals = [
        (vehicles[1], -2, 3, "TURO123456", RentalStatus::Active),
        (vehicles[0], 5, 8, "TURO789012", RentalStatus::Upcoming),
    ];
    for (vehicle_id, start, end, booking, status) in rentals {
        storage.rentals.insert_with(|id| {
            Ok(Rental::from_new(
                id,
                NewRental {
                    vehicle_id,
                    start_date: now + Duration::days(start),
                    end_date: now + Duration::days(end),
                    turo_booking_id: Some(booking.into()),
                    status: Some(status),
                },
            ))
        })?;
    }

    let reminders = [
        (vehicles[4], "cleaning", "Deep clean after last rental", 1),
        (vehicles[0], "cleaning", "Basic clean", 4),
    ];
    for (vehicle_id, kind, description, days) in reminders {
        storage.reminders.insert_with(|id| {
            Ok(Reminder::new(
                id,
                vehicle_id,
                kind,
                Some(description.into()),
                now + Duration::days(days),
            ))
        })?;
    }

    let notes = [
        "Great overall condition, very popular with renters",
        "Regular customer prefers this car",
        "Brake pads due at next service",
        "Suspension noise to check",
        "Full cleaning needed after last rental",
    ];
    for (vehicle_id, content) in vehicles.iter().zip(notes) {
        storage
            .notes
            .insert_with(|id| Ok(Note::new(id, *vehicle_id, content)))?;
    }

    info!(vehicles = vehicles.len(), "seeded demo fleet");
    Ok(())
}
