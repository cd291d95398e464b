//! Fleet Manager - rental fleet backend with a field-level action history
//!
//! This library provides the core functionality for the fleet manager:
//! vehicles and the records attached to them, plus an audit trail that
//! stores exactly which fields changed on every tracked mutation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration, path management and logging setup
//! - `error`: Custom error types
//! - `models`: Core data models (vehicles, maintenance, rentals, etc.)
//! - `storage`: JSON file storage layer
//! - `audit`: Diff engine and append-only change ledger
//! - `services`: Business logic layer
//! - `backup`: Automatic backup management
//! - `export`: History export (CSV, JSON, YAML)
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use fleet::config::{paths::FleetPaths, settings::Settings};
//! use fleet::storage::Storage;
//!
//! let paths = FleetPaths::new()?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FleetError, FleetResult};
