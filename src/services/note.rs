//! Note service

use serde_json::{json, Value};
use tracing::info;

use crate::audit::{ActionKind, AuditRecorder, Audited, EntityType};
use crate::error::{FleetError, FleetResult};
use crate::models::{Note, NoteId, UserId, VehicleId};
use crate::storage::Storage;

/// Service for vehicle notes
pub struct NoteService<'a> {
    storage: &'a Storage,
}

impl<'a> NoteService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Notes of a vehicle, newest first
    pub fn list(&self, vehicle_id: VehicleId) -> FleetResult<Vec<Note>> {
        self.ensure_vehicle(vehicle_id)?;
        self.storage.notes.for_vehicle(vehicle_id)
    }

    pub fn require(&self, id: NoteId) -> FleetResult<Note> {
        self.storage
            .notes
            .get(id)?
            .ok_or_else(|| FleetError::note_not_found(id.to_string()))
    }

    /// Attach a note to a vehicle
    pub fn add(&self, actor: UserId, vehicle_id: VehicleId, content: &str) -> FleetResult<Audited<Note>> {
        Note::validate_content(content).map_err(FleetError::Validation)?;
        self.ensure_vehicle(vehicle_id)?;

        let note = self
            .storage
            .notes
            .insert_with(|id| Ok(Note::new(id, vehicle_id, content)))?;
        self.storage.notes.save()?;

        info!(note = %note.id, vehicle = %vehicle_id, "note added");

        let audit = self.storage.recorder().record(
            actor,
            ActionKind::Create,
            EntityType::Note,
            note.id.get(),
            json!({ "content": content }),
        );

        Ok(Audited::new(note, audit))
    }

    /// Replace the content of a note
    ///
    /// The new content goes to the diff engine as a bare value and is
    /// resolved before the note is overwritten.
    pub fn update(&self, actor: UserId, id: NoteId, content: &str) -> FleetResult<Audited<Note>> {
        self.update_with(&self.storage.recorder(), actor, id, content)
    }

    fn update_with(
        &self,
        recorder: &AuditRecorder<'_>,
        actor: UserId,
        id: NoteId,
        content: &str,
    ) -> FleetResult<Audited<Note>> {
        Note::validate_content(content).map_err(FleetError::Validation)?;
        let mut note = self.require(id)?;

        let prepared = recorder.prepare(
            ActionKind::Update,
            EntityType::Note,
            id.get(),
            json!({ "content": content }),
        );

        if note.content != content {
            note.content = content.to_string();
            note.updated_at = chrono::Utc::now();
            self.storage.notes.upsert(note.clone())?;
            self.storage.notes.save()?;
        }

        let audit = recorder.commit(actor, prepared);
        Ok(Audited::new(note, audit))
    }

    /// Delete a note
    pub fn delete(&self, actor: UserId, id: NoteId) -> FleetResult<Audited<Note>> {
        let note = self
            .storage
            .notes
            .delete(id)?
            .ok_or_else(|| FleetError::note_not_found(id.to_string()))?;
        self.storage.notes.save()?;

        let audit = self.storage.recorder().record(
            actor,
            ActionKind::Delete,
            EntityType::Note,
            id.get(),
            Value::Null,
        );

        Ok(Audited::new(note, audit))
    }

    fn ensure_vehicle(&self, vehicle_id: VehicleId) -> FleetResult<()> {
        if self.storage.vehicles.exists(vehicle_id)? {
            Ok(())
        } else {
            Err(FleetError::vehicle_not_found(vehicle_id.to_string()))
        }
    }
}
