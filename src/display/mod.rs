//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for the CLI.

pub mod backup;
pub mod dashboard;
pub mod fleet;
pub mod history;
pub mod vehicle;

pub use backup::format_backup_list;
pub use dashboard::format_dashboard;
pub use fleet::{format_maintenance_list, format_note_list, format_reminder_list, format_rental_list};
pub use history::{format_history, format_removal};
pub use vehicle::{format_vehicle_details, format_vehicle_list};
