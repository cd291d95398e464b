//! Rental model
//!
//! A booking of a vehicle over a date range, optionally linked to an
//! external booking reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{RentalId, VehicleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown rental status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRental {
    pub vehicle_id: VehicleId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turo_booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RentalStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    pub vehicle_id: VehicleId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub turo_booking_id: Option<String>,
    #[serde(default)]
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
}

impl Rental {
    pub fn from_new(id: RentalId, input: NewRental) -> Self {
        Self {
            id,
            vehicle_id: input.vehicle_id,
            start_date: input.start_date,
            end_date: input.end_date,
            turo_booking_id: input
                .turo_booking_id
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end_date <= self.start_date {
            return Err("Rental end date must be after its start date".into());
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_date_order_validation() {
        let start = Utc::now();
        let rental = Rental::from_new(
            RentalId::new(1),
            NewRental {
                vehicle_id: VehicleId::new(1),
                start_date: start,
                end_date: start - Duration::days(1),
                turo_booking_id: None,
                status: None,
            },
        );
        assert!(rental.validate().is_err());
    }

    #[test]
    fn test_blank_booking_id_dropped() {
        let start = Utc::now();
        let rental = Rental::from_new(
            RentalId::new(1),
            NewRental {
                vehicle_id: VehicleId::new(1),
                start_date: start,
                end_date: start + Duration::days(3),
                turo_booking_id: Some(" ".into()),
                status: Some(RentalStatus::Active),
            },
        );
        assert!(rental.turo_booking_id.is_none());
        assert!(rental.is_active());
        assert!(rental.validate().is_ok());
    }

    #[test]
    fn test_status_parse_accepts_us_spelling() {
        assert_eq!(
            "canceled".parse::<RentalStatus>().unwrap(),
            RentalStatus::Cancelled
        );
    }
}
