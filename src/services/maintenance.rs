//! Maintenance service
//!
//! Scheduling and editing of maintenance jobs. Edits arrive as raw field
//! patches; their diff is resolved against the stored job before it is
//! overwritten.

use serde_json::Value;
use tracing::info;

use crate::audit::{ActionKind, AuditRecorder, Audited, EntityType};
use crate::error::{FleetError, FleetResult};
use crate::models::{Maintenance, MaintenanceId, NewMaintenance, UserId, VehicleId};
use crate::storage::Storage;

use super::patch::apply_patch;

/// Service for maintenance management
pub struct MaintenanceService<'a> {
    storage: &'a Storage,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All maintenance (newest date first), optionally for one vehicle
    pub fn list(&self, vehicle_id: Option<VehicleId>) -> FleetResult<Vec<Maintenance>> {
        match vehicle_id {
            Some(vehicle_id) => self.storage.maintenances.for_vehicle(vehicle_id),
            None => self.storage.maintenances.all_by_date(),
        }
    }

    pub fn get(&self, id: MaintenanceId) -> FleetResult<Option<Maintenance>> {
        self.storage.maintenances.get(id)
    }

    pub fn require(&self, id: MaintenanceId) -> FleetResult<Maintenance> {
        self.get(id)?
            .ok_or_else(|| FleetError::maintenance_not_found(id.to_string()))
    }

    /// Schedule a maintenance job for an existing vehicle
    pub fn create(&self, actor: UserId, input: NewMaintenance) -> FleetResult<Audited<Maintenance>> {
        if !self.storage.vehicles.exists(input.vehicle_id)? {
            return Err(FleetError::vehicle_not_found(input.vehicle_id.to_string()));
        }

        let payload = serde_json::to_value(&input)?;

        let maintenance = self.storage.maintenances.insert_with(|id| {
            let maintenance = Maintenance::from_new(id, input);
            maintenance.validate().map_err(FleetError::Validation)?;
            Ok(maintenance)
        })?;
        self.storage.maintenances.save()?;

        info!(maintenance = %maintenance.id, vehicle = %maintenance.vehicle_id, "maintenance scheduled");

        let audit = self.storage.recorder().record(
            actor,
            ActionKind::Create,
            EntityType::Maintenance,
            maintenance.id.get(),
            payload,
        );

        Ok(Audited::new(maintenance, audit))
    }

    /// Apply a raw field patch, e.g. `{"status": "completed"}`
    pub fn update(
        &self,
        actor: UserId,
        id: MaintenanceId,
        patch: &Value,
    ) -> FleetResult<Audited<Maintenance>> {
        self.update_with(&self.storage.recorder(), actor, id, patch)
    }

    fn update_with(
        &self,
        recorder: &AuditRecorder<'_>,
        actor: UserId,
        id: MaintenanceId,
        patch: &Value,
    ) -> FleetResult<Audited<Maintenance>> {
        let current = self.require(id)?;
        let (mut updated, mut changes) = apply_patch(&current, patch)?;
        updated.normalize();
        if let Some(kind) = changes.get_mut("type") {
            *kind = Value::String(updated.kind.clone());
        }
        updated.validate().map_err(FleetError::Validation)?;

        let prepared = recorder.prepare(
            ActionKind::Update,
            EntityType::Maintenance,
            id.get(),
            Value::Object(changes),
        );

        if updated != current {
            self.storage.maintenances.upsert(updated.clone())?;
            self.storage.maintenances.save()?;
        }

        let audit = recorder.commit(actor, prepared);
        Ok(Audited::new(updated, audit))
    }
}
