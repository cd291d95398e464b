//! Custom error types for the fleet manager
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for fleet operations
#[derive(Error, Debug)]
pub enum FleetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and inputs
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A resource is already held by another entity (e.g. a parking spot)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or rejected actor identity
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FleetError {
    /// Create a "not found" error for vehicles
    pub fn vehicle_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Vehicle",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for notes
    pub fn note_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Note",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for maintenance records
    pub fn maintenance_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Maintenance",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for reminders
    pub fn reminder_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Reminder",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FleetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for fleet operations
pub type FleetResult<T> = Result<T, FleetError>;
