//! Maintenance record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{MaintenanceId, VehicleId};

/// Progress of a maintenance job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown maintenance status: {}", s)),
        }
    }
}

/// Input for scheduling maintenance; recorded verbatim as the create payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaintenance {
    pub vehicle_id: VehicleId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MaintenanceStatus>,
}

/// A maintenance job for a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: MaintenanceId,
    pub vehicle_id: VehicleId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: MaintenanceStatus,
    pub created_at: DateTime<Utc>,
}

impl Maintenance {
    pub fn from_new(id: MaintenanceId, input: NewMaintenance) -> Self {
        let mut maintenance = Self {
            id,
            vehicle_id: input.vehicle_id,
            kind: input.kind,
            description: input.description,
            date: input.date,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        maintenance.normalize();
        maintenance
    }

    /// Trim the free-text type, on create and after every patch
    pub fn normalize(&mut self) {
        let trimmed = self.kind.trim();
        if trimmed.len() != self.kind.len() {
            self.kind = trimmed.to_string();
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.kind.trim().is_empty() {
            return Err("Maintenance type is required".into());
        }
        if self.kind.len() > 50 {
            return Err("Maintenance type is too long (max 50 chars)".into());
        }
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == MaintenanceStatus::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewMaintenance {
        NewMaintenance {
            vehicle_id: VehicleId::new(1),
            kind: "Revision".into(),
            description: None,
            date: Utc::now(),
            status: None,
        }
    }

    #[test]
    fn test_defaults_to_scheduled() {
        let m = Maintenance::from_new(MaintenanceId::new(1), sample());
        assert_eq!(m.status, MaintenanceStatus::Scheduled);
        assert!(m.is_pending());
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let m = Maintenance::from_new(MaintenanceId::new(1), sample());
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["type"], "Revision");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_normalize_trims_type() {
        let mut m = Maintenance::from_new(MaintenanceId::new(1), sample());
        m.kind = "  Brake check ".into();
        m.normalize();
        assert_eq!(m.kind, "Brake check");
    }

    #[test]
    fn test_validate_requires_type() {
        let mut input = sample();
        input.kind = "  ".into();
        let m = Maintenance::from_new(MaintenanceId::new(1), input);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "in progress".parse::<MaintenanceStatus>().unwrap(),
            MaintenanceStatus::InProgress
        );
        assert!("done".parse::<MaintenanceStatus>().is_err());
    }
}
