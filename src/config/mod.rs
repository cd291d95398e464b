//! Configuration module for the fleet manager
//!
//! - Path resolution for data, backups and settings
//! - Persisted settings
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod settings;

pub use logging::init_tracing;
pub use paths::FleetPaths;
pub use settings::Settings;
