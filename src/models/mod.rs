//! Core data models for the fleet manager
//!
//! Vehicles and everything attached to them (maintenance, rentals,
//! reminders, notes) plus the users acting on them.

pub mod ids;
pub mod maintenance;
pub mod note;
pub mod rental;
pub mod reminder;
pub mod user;
pub mod vehicle;

pub use ids::{ChangeRecordId, MaintenanceId, NoteId, ReminderId, RentalId, UserId, VehicleId};
pub use maintenance::{Maintenance, MaintenanceStatus, NewMaintenance};
pub use note::Note;
pub use rental::{NewRental, Rental, RentalStatus};
pub use reminder::{Reminder, ReminderStatus};
pub use user::User;
pub use vehicle::{NewVehicle, Vehicle, VehicleStatus, VehicleUpdate, VehicleValidationError};
