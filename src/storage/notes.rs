//! Note repository

use crate::error::FleetResult;
use crate::models::{Note, NoteId, VehicleId};

use super::table::{Record, Table};

impl Record for Note {
    type Id = NoteId;

    fn id(&self) -> NoteId {
        self.id
    }
}

pub type NoteRepository = Table<Note>;

impl Table<Note> {
    /// Notes of a vehicle, newest first
    pub fn for_vehicle(&self, vehicle_id: VehicleId) -> FleetResult<Vec<Note>> {
        let mut rows = self.filter(|n| n.vehicle_id == vehicle_id)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}
