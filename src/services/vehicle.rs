//! Vehicle service
//!
//! Provides business logic for the fleet itself: registration, partial
//! updates and removal with cascading cleanup. Every mutation is recorded
//! in the action history.

use serde_json::Value;
use tracing::info;

use crate::audit::{field_changes, ActionKind, AuditOutcome, Audited, EntityType};
use crate::error::{FleetError, FleetResult};
use crate::models::{NewVehicle, UserId, Vehicle, VehicleId, VehicleStatus, VehicleUpdate};
use crate::storage::Storage;

/// Service for vehicle management
pub struct VehicleService<'a> {
    storage: &'a Storage,
}

/// What a vehicle delete took with it
#[derive(Debug, Clone)]
pub struct VehicleRemoval {
    pub vehicle: Vehicle,
    pub maintenances: usize,
    pub rentals: usize,
    pub reminders: usize,
    pub notes: usize,
}

impl<'a> VehicleService<'a> {
    /// Create a new vehicle service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a vehicle
    ///
    /// The recorded `create` payload is the input as given.
    pub fn create(&self, actor: UserId, input: NewVehicle) -> FleetResult<Audited<Vehicle>> {
        if self.storage.vehicles.plate_taken(&input.license_plate, None)? {
            return Err(FleetError::Duplicate {
                entity_type: "Vehicle",
                identifier: input.license_plate.trim().to_string(),
            });
        }
        if let Some(spot) = input.parking_spot.as_deref() {
            self.ensure_spot_free(spot, None)?;
        }

        let payload = serde_json::to_value(&input)?;

        let vehicle = self.storage.vehicles.insert_with(|id| {
            let vehicle = Vehicle::from_new(id, input);
            vehicle
                .validate()
                .map_err(|e| FleetError::Validation(e.to_string()))?;
            Ok(vehicle)
        })?;
        self.storage.vehicles.save()?;

        info!(vehicle = %vehicle.id, plate = %vehicle.license_plate, "vehicle created");

        let audit = self.storage.recorder().record(
            actor,
            ActionKind::Create,
            EntityType::Vehicle,
            vehicle.id.get(),
            payload,
        );

        Ok(Audited::new(vehicle, audit))
    }

    /// Get a vehicle by ID
    pub fn get(&self, id: VehicleId) -> FleetResult<Option<Vehicle>> {
        self.storage.vehicles.get(id)
    }

    /// Get a vehicle by ID or fail with not found
    pub fn require(&self, id: VehicleId) -> FleetResult<Vehicle> {
        self.get(id)?
            .ok_or_else(|| FleetError::vehicle_not_found(id.to_string()))
    }

    /// Find a vehicle by license plate or ID string
    pub fn find(&self, identifier: &str) -> FleetResult<Option<Vehicle>> {
        if let Some(vehicle) = self.storage.vehicles.find_by_plate(identifier)? {
            return Ok(Some(vehicle));
        }

        if let Ok(id) = identifier.parse::<VehicleId>() {
            return self.storage.vehicles.get(id);
        }

        Ok(None)
    }

    /// List vehicles, optionally only those with a given status
    pub fn list(&self, status: Option<VehicleStatus>) -> FleetResult<Vec<Vehicle>> {
        match status {
            Some(status) => self.storage.vehicles.filter(|v| v.status == status),
            None => self.storage.vehicles.all(),
        }
    }

    /// Apply a partial update
    ///
    /// The diff is computed here from the before/after snapshots; an update
    /// that changes nothing is neither saved nor recorded.
    pub fn update(
        &self,
        actor: UserId,
        id: VehicleId,
        update: VehicleUpdate,
    ) -> FleetResult<Audited<Vehicle>> {
        let mut vehicle = self.require(id)?;

        if let Some(plate) = update.license_plate.as_deref() {
            if self.storage.vehicles.plate_taken(plate, Some(id))? {
                return Err(FleetError::Duplicate {
                    entity_type: "Vehicle",
                    identifier: plate.trim().to_string(),
                });
            }
        }
        if let Some(Some(spot)) = update.parking_spot.as_ref() {
            self.ensure_spot_free(spot, Some(id))?;
        }

        let before = serde_json::to_value(&vehicle)?;
        vehicle.apply(update);
        vehicle
            .validate()
            .map_err(|e| FleetError::Validation(e.to_string()))?;
        let after = serde_json::to_value(&vehicle)?;

        let changes = field_changes(&before, &after);
        if changes.is_empty() {
            return Ok(Audited::new(vehicle, AuditOutcome::Unchanged));
        }

        self.storage.vehicles.upsert(vehicle.clone())?;
        self.storage.vehicles.save()?;

        let audit = self.storage.recorder().record(
            actor,
            ActionKind::Update,
            EntityType::Vehicle,
            id.get(),
            Value::Object(changes),
        );

        Ok(Audited::new(vehicle, audit))
    }

    /// Shortcut for a status-only update
    pub fn set_status(
        &self,
        actor: UserId,
        id: VehicleId,
        status: VehicleStatus,
    ) -> FleetResult<Audited<Vehicle>> {
        self.update(
            actor,
            id,
            VehicleUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Delete a vehicle and everything attached to it
    ///
    /// The vehicle's history stays; the delete record carries its last
    /// snapshot.
    pub fn delete(&self, actor: UserId, id: VehicleId) -> FleetResult<Audited<VehicleRemoval>> {
        let vehicle = self.require(id)?;
        let snapshot = serde_json::to_value(&vehicle)?;

        let maintenances = self.storage.maintenances.delete_where(|m| m.vehicle_id == id)?;
        let rentals = self.storage.rentals.delete_where(|r| r.vehicle_id == id)?;
        let reminders = self.storage.reminders.delete_where(|r| r.vehicle_id == id)?;
        let notes = self.storage.notes.delete_where(|n| n.vehicle_id == id)?;
        self.storage.vehicles.delete(id)?;
        self.storage.save_all()?;

        info!(
            vehicle = %id,
            maintenances = maintenances.len(),
            rentals = rentals.len(),
            reminders = reminders.len(),
            notes = notes.len(),
            "vehicle deleted"
        );

        let audit = self.storage.recorder().record(
            actor,
            ActionKind::Delete,
            EntityType::Vehicle,
            id.get(),
            snapshot,
        );

        Ok(Audited::new(
            VehicleRemoval {
                vehicle,
                maintenances: maintenances.len(),
                rentals: rentals.len(),
                reminders: reminders.len(),
                notes: notes.len(),
            },
            audit,
        ))
    }

    fn ensure_spot_free(&self, spot: &str, exclude: Option<VehicleId>) -> FleetResult<()> {
        if let Some(holder) = self.storage.vehicles.find_by_parking_spot(spot)? {
            if Some(holder.id) != exclude {
                return Err(FleetError::Conflict(format!(
                    "Parking spot {} is already taken by {}",
                    spot.trim(),
                    holder.label()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditError, ChangeLedger, HistoryFilter};
    use crate::models::{Note, NoteId};
    use crate::services::testing::{add_user, create_test_storage};
    use serde_json::json;

    fn tesla() -> NewVehicle {
        NewVehicle {
            brand: "Tesla".into(),
            model: "Model 3".into(),
            year: 2023,
            license_plate: "ABC123".into(),
            parking_spot: Some("A1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_records_input_payload() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);

        let created = service.create(actor, tesla()).unwrap();
        let record = created.audit.record().unwrap();

        assert_eq!(record.action, ActionKind::Create);
        assert_eq!(record.entity_id, created.value.id.get());
        assert_eq!(
            record.changes,
            json!({"brand": "Tesla", "model": "Model 3", "year": 2023, "license_plate": "ABC123", "parking_spot": "A1"})
        );
    }

    #[test]
    fn test_create_rejects_duplicate_plate_and_taken_spot() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        service.create(actor, tesla()).unwrap();

        let err = service.create(actor, tesla()).unwrap_err();
        assert!(matches!(err, FleetError::Duplicate { .. }));

        let mut other = tesla();
        other.license_plate = "XYZ789".into();
        let err = service.create(actor, other).unwrap_err();
        assert!(matches!(err, FleetError::Conflict(_)));
    }

    #[test]
    fn test_create_validates() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);

        let mut input = tesla();
        input.year = 1700;
        assert!(service.create(actor, input).unwrap_err().is_validation());
        assert_eq!(storage.vehicles.count().unwrap(), 0);
        assert_eq!(storage.history.count().unwrap(), 0);
    }

    #[test]
    fn test_status_change_recorded_as_pair() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        let id = service.create(actor, tesla()).unwrap().value.id;

        let updated = service.set_status(actor, id, VehicleStatus::Rented).unwrap();

        assert_eq!(updated.value.status, VehicleStatus::Rented);
        assert_eq!(
            updated.audit.record().unwrap().changes,
            json!({"status": {"old": "available", "new": "rented"}})
        );
    }

    #[test]
    fn test_noop_update_writes_no_record() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        let id = service.create(actor, tesla()).unwrap().value.id;

        let result = service
            .update(
                actor,
                id,
                VehicleUpdate {
                    brand: Some("Tesla".into()),
                    status: Some(VehicleStatus::Available),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(result.audit, AuditOutcome::Unchanged);
        assert_eq!(storage.history.count().unwrap(), 1);
    }

    #[test]
    fn test_release_parking_spot() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        let id = service.create(actor, tesla()).unwrap().value.id;

        let result = service
            .update(
                actor,
                id,
                VehicleUpdate {
                    parking_spot: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(result.value.parking_spot, None);
        assert_eq!(
            result.audit.record().unwrap().changes,
            json!({"parking_spot": {"old": "A1", "new": null}})
        );
    }

    #[test]
    fn test_clear_daily_rate() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        let input = NewVehicle {
            daily_rate: Some(89.5),
            ..tesla()
        };
        let id = service.create(actor, input).unwrap().value.id;

        let result = service
            .update(
                actor,
                id,
                VehicleUpdate {
                    daily_rate: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(result.value.daily_rate, None);
        assert_eq!(service.require(id).unwrap().daily_rate, None);
        assert_eq!(
            result.audit.record().unwrap().changes,
            json!({"daily_rate": {"old": 89.5, "new": null}})
        );
    }

    #[test]
    fn test_update_unknown_vehicle() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);

        let err = service
            .set_status(actor, VehicleId::new(9), VehicleStatus::Rented)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_cascades_but_keeps_history() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        let id = service.create(actor, tesla()).unwrap().value.id;
        service.set_status(actor, id, VehicleStatus::Rented).unwrap();
        storage
            .notes
            .insert_with(|note_id: NoteId| Ok(Note::new(note_id, id, "scratch")))
            .unwrap();

        let removed = service.delete(actor, id).unwrap();

        assert_eq!(removed.value.notes, 1);
        assert!(service.get(id).unwrap().is_none());
        assert_eq!(storage.notes.count().unwrap(), 0);

        let history = storage
            .history
            .list(
                &HistoryFilter::new()
                    .entity_type(EntityType::Vehicle)
                    .entity_id(id.get()),
            )
            .unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].action, ActionKind::Delete);
        assert_eq!(history[0].changes["license_plate"], "ABC123");
    }

    #[test]
    fn test_unknown_actor_does_not_block_mutation() {
        let (_temp, storage) = create_test_storage();
        let service = VehicleService::new(&storage);

        let created = service.create(UserId::new(77), tesla()).unwrap();

        assert_eq!(storage.vehicles.count().unwrap(), 1);
        assert_eq!(
            created.audit.failure(),
            Some(&AuditError::UnknownActor(UserId::new(77)))
        );
    }

    #[test]
    fn test_find_by_plate_or_id() {
        let (_temp, storage) = create_test_storage();
        let actor = add_user(&storage, "alice");
        let service = VehicleService::new(&storage);
        let id = service.create(actor, tesla()).unwrap().value.id;

        assert_eq!(service.find("abc123").unwrap().unwrap().id, id);
        assert_eq!(service.find(&id.to_string()).unwrap().unwrap().id, id);
        assert!(service.find("nope").unwrap().is_none());
    }
}
