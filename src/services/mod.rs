//! Service layer for the fleet manager
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, cross-entity operations and the action history.
//! Mutating calls on vehicles, notes and maintenance take the acting user
//! and return an [`Audited`](crate::audit::Audited) value.

pub mod dashboard;
pub mod history;
pub mod maintenance;
pub mod note;
pub mod patch;
pub mod reminder;
pub mod rental;
pub mod user;
pub mod vehicle;

pub use dashboard::{DashboardService, DashboardStats};
pub use history::HistoryService;
pub use maintenance::MaintenanceService;
pub use note::NoteService;
pub use reminder::ReminderService;
pub use rental::RentalService;
pub use user::UserService;
pub use vehicle::{VehicleRemoval, VehicleService};
