//! Vehicle model
//!
//! A vehicle in the rental fleet, with its availability status and an
//! optional assigned parking spot.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::VehicleId;

/// Availability status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
    NeedsRepair,
    NeedsCleaning,
}

impl VehicleStatus {
    pub fn all() -> &'static [VehicleStatus] {
        &[
            Self::Available,
            Self::Rented,
            Self::Maintenance,
            Self::NeedsRepair,
            Self::NeedsCleaning,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
            Self::Maintenance => "maintenance",
            Self::NeedsRepair => "needs_repair",
            Self::NeedsCleaning => "needs_cleaning",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown vehicle status: {}", s))
    }
}

/// Input for creating a vehicle.
///
/// Its serialized form is what gets recorded as the `create` payload, so
/// fields the caller left out stay out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
}

/// Partial update of a vehicle; `None` leaves a field untouched.
///
/// `parking_spot: Some(None)` releases the spot and `daily_rate: Some(None)`
/// clears the rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub status: Option<VehicleStatus>,
    pub parking_spot: Option<Option<String>>,
    pub daily_rate: Option<Option<f64>>,
}

impl VehicleUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A fleet vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub parking_spot: Option<String>,
    #[serde(default)]
    pub daily_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Build a vehicle from creation input
    pub fn from_new(id: VehicleId, input: NewVehicle) -> Self {
        Self {
            id,
            brand: input.brand.trim().to_string(),
            model: input.model.trim().to_string(),
            year: input.year,
            license_plate: input.license_plate.trim().to_string(),
            status: input.status.unwrap_or_default(),
            parking_spot: normalize_spot(input.parking_spot),
            daily_rate: input.daily_rate,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: VehicleUpdate) {
        if let Some(brand) = update.brand {
            self.brand = brand.trim().to_string();
        }
        if let Some(model) = update.model {
            self.model = model.trim().to_string();
        }
        if let Some(year) = update.year {
            self.year = year;
        }
        if let Some(plate) = update.license_plate {
            self.license_plate = plate.trim().to_string();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(spot) = update.parking_spot {
            self.parking_spot = normalize_spot(spot);
        }
        if let Some(rate) = update.daily_rate {
            self.daily_rate = rate;
        }
    }

    /// Display name, e.g. "Tesla Model 3 (ABC123)"
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.license_plate)
    }

    /// Validate the vehicle
    pub fn validate(&self) -> Result<(), VehicleValidationError> {
        if self.brand.is_empty() {
            return Err(VehicleValidationError::MissingField("brand"));
        }
        if self.model.is_empty() {
            return Err(VehicleValidationError::MissingField("model"));
        }
        if self.license_plate.is_empty() {
            return Err(VehicleValidationError::MissingField("license_plate"));
        }
        if self.brand.len() > 50 {
            return Err(VehicleValidationError::TooLong("brand", 50));
        }
        if self.model.len() > 50 {
            return Err(VehicleValidationError::TooLong("model", 50));
        }
        if self.license_plate.len() > 20 {
            return Err(VehicleValidationError::TooLong("license_plate", 20));
        }
        if let Some(spot) = &self.parking_spot {
            if spot.len() > 20 {
                return Err(VehicleValidationError::TooLong("parking_spot", 20));
            }
        }

        let max_year = Utc::now().year() + 1;
        if self.year < 1886 || self.year > max_year {
            return Err(VehicleValidationError::InvalidYear(self.year));
        }

        if let Some(rate) = self.daily_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(VehicleValidationError::InvalidDailyRate);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn normalize_spot(spot: Option<String>) -> Option<String> {
    spot.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Validation errors for vehicles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleValidationError {
    MissingField(&'static str),
    TooLong(&'static str, usize),
    InvalidYear(i32),
    InvalidDailyRate,
}

impl fmt::Display for VehicleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Field '{}' is required", field),
            Self::TooLong(field, max) => {
                write!(f, "Field '{}' is too long (max {} chars)", field, max)
            }
            Self::InvalidYear(year) => write!(f, "Invalid year: {}", year),
            Self::InvalidDailyRate => write!(f, "Daily rate must be a non-negative number"),
        }
    }
}

impl std::error::Error for VehicleValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> NewVehicle {
        NewVehicle {
            brand: "Tesla".into(),
            model: "Model 3".into(),
            year: 2023,
            license_plate: "ABC123".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_new_defaults() {
        let vehicle = Vehicle::from_new(VehicleId::new(1), sample_input());
        assert_eq!(vehicle.status, VehicleStatus::Available);
        assert!(vehicle.parking_spot.is_none());
        assert!(vehicle.validate().is_ok());
    }

    #[test]
    fn test_blank_parking_spot_is_none() {
        let mut input = sample_input();
        input.parking_spot = Some("  ".into());
        let vehicle = Vehicle::from_new(VehicleId::new(1), input);
        assert!(vehicle.parking_spot.is_none());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "needs-repair".parse::<VehicleStatus>().unwrap(),
            VehicleStatus::NeedsRepair
        );
        assert_eq!("RENTED".parse::<VehicleStatus>().unwrap(), VehicleStatus::Rented);
        assert!("flying".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&VehicleStatus::NeedsCleaning).unwrap();
        assert_eq!(json, "\"needs_cleaning\"");
    }

    #[test]
    fn test_new_vehicle_payload_omits_unset_fields() {
        let value = serde_json::to_value(sample_input()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(!obj.contains_key("status"));
    }

    #[test]
    fn test_apply_update() {
        let mut vehicle = Vehicle::from_new(VehicleId::new(1), sample_input());
        vehicle.parking_spot = Some("A1".into());

        vehicle.apply(VehicleUpdate {
            status: Some(VehicleStatus::Rented),
            parking_spot: Some(None),
            ..Default::default()
        });

        assert_eq!(vehicle.status, VehicleStatus::Rented);
        assert!(vehicle.parking_spot.is_none());
        assert_eq!(vehicle.brand, "Tesla");
    }

    #[test]
    fn test_apply_sets_and_clears_rate() {
        let mut vehicle = Vehicle::from_new(VehicleId::new(1), sample_input());

        vehicle.apply(VehicleUpdate {
            daily_rate: Some(Some(75.0)),
            ..Default::default()
        });
        assert_eq!(vehicle.daily_rate, Some(75.0));

        vehicle.apply(VehicleUpdate::default());
        assert_eq!(vehicle.daily_rate, Some(75.0));

        vehicle.apply(VehicleUpdate {
            daily_rate: Some(None),
            ..Default::default()
        });
        assert_eq!(vehicle.daily_rate, None);
    }

    #[test]
    fn test_validation() {
        let mut vehicle = Vehicle::from_new(VehicleId::new(1), sample_input());

        vehicle.brand = String::new();
        assert_eq!(
            vehicle.validate(),
            Err(VehicleValidationError::MissingField("brand"))
        );

        vehicle.brand = "Tesla".into();
        vehicle.year = 1800;
        assert_eq!(vehicle.validate(), Err(VehicleValidationError::InvalidYear(1800)));

        vehicle.year = 2020;
        vehicle.daily_rate = Some(-1.0);
        assert_eq!(vehicle.validate(), Err(VehicleValidationError::InvalidDailyRate));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(VehicleUpdate::default().is_empty());
        assert!(!VehicleUpdate {
            year: Some(2020),
            ..Default::default()
        }
        .is_empty());
    }
}
