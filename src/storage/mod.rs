//! Storage layer for the fleet manager
//!
//! One JSON table file per entity kind with atomic writes, plus the
//! append-only action history. The [`Storage`] coordinator is also what the
//! audit trail reads live entity state and actors through.

pub mod file_io;
pub mod init;
pub mod maintenances;
pub mod notes;
pub mod reminders;
pub mod rentals;
pub mod table;
pub mod users;
pub mod vehicles;

pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, needs_initialization};
pub use maintenances::MaintenanceRepository;
pub use notes::NoteRepository;
pub use reminders::ReminderRepository;
pub use rentals::RentalRepository;
pub use table::{Record, Table};
pub use users::UserRepository;
pub use vehicles::VehicleRepository;

use serde::Serialize;
use serde_json::Value;

use crate::audit::{ActorDirectory, AuditRecorder, EntityResolver, EntityType, JsonlLedger};
use crate::config::paths::FleetPaths;
use crate::error::FleetResult;
use crate::models::{MaintenanceId, NoteId, UserId, VehicleId};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FleetPaths,
    pub vehicles: VehicleRepository,
    pub maintenances: MaintenanceRepository,
    pub rentals: RentalRepository,
    pub reminders: ReminderRepository,
    pub notes: NoteRepository,
    pub users: UserRepository,
    pub history: JsonlLedger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: FleetPaths) -> FleetResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            vehicles: VehicleRepository::new(paths.vehicles_file()),
            maintenances: MaintenanceRepository::new(paths.maintenances_file()),
            rentals: RentalRepository::new(paths.rentals_file()),
            reminders: ReminderRepository::new(paths.reminders_file()),
            notes: NoteRepository::new(paths.notes_file()),
            users: UserRepository::new(paths.users_file()),
            history: JsonlLedger::new(paths.history_file(), paths.history_seq_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &FleetPaths {
        &self.paths
    }

    /// Load all tables from disk
    pub fn load_all(&self) -> FleetResult<()> {
        self.vehicles.load()?;
        self.maintenances.load()?;
        self.rentals.load()?;
        self.reminders.load()?;
        self.notes.load()?;
        self.users.load()?;
        Ok(())
    }

    /// Save all tables to disk
    pub fn save_all(&self) -> FleetResult<()> {
        self.vehicles.save()?;
        self.maintenances.save()?;
        self.rentals.save()?;
        self.reminders.save()?;
        self.notes.save()?;
        self.users.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Audit recorder backed by this storage
    pub fn recorder(&self) -> AuditRecorder<'_> {
        AuditRecorder::new(&self.history, self, self)
    }

    /// Username for an actor id, if the user still exists
    pub fn actor_name(&self, actor_id: UserId) -> FleetResult<Option<String>> {
        Ok(self.users.get(actor_id)?.map(|u| u.username))
    }
}

fn snapshot_of<T: Serialize>(row: Option<T>) -> FleetResult<Option<Value>> {
    Ok(row.map(serde_json::to_value).transpose()?)
}

impl EntityResolver for Storage {
    fn snapshot(&self, entity_type: EntityType, entity_id: u64) -> FleetResult<Option<Value>> {
        match entity_type {
            EntityType::Vehicle => snapshot_of(self.vehicles.get(VehicleId::new(entity_id))?),
            EntityType::Note => snapshot_of(self.notes.get(NoteId::new(entity_id))?),
            EntityType::Maintenance => {
                snapshot_of(self.maintenances.get(MaintenanceId::new(entity_id))?)
            }
            EntityType::Rental | EntityType::Reminder => Ok(None),
        }
    }
}

impl ActorDirectory for Storage {
    fn actor_exists(&self, actor_id: UserId) -> FleetResult<bool> {
        self.users.exists(actor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewVehicle, User, Vehicle};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_resolver_snapshots_tracked_entities() {
        let (_temp_dir, storage) = create_test_storage();
        let vehicle = storage
            .vehicles
            .insert_with(|id| {
                Ok(Vehicle::from_new(
                    id,
                    NewVehicle {
                        brand: "Tesla".into(),
                        model: "Model 3".into(),
                        year: 2023,
                        license_plate: "ABC123".into(),
                        ..Default::default()
                    },
                ))
            })
            .unwrap();

        let snapshot = storage
            .snapshot(EntityType::Vehicle, vehicle.id.get())
            .unwrap()
            .unwrap();
        assert_eq!(snapshot["status"], json!("available"));
        assert_eq!(snapshot["parking_spot"], json!(null));

        assert!(storage.snapshot(EntityType::Vehicle, 99).unwrap().is_none());
        assert!(storage.snapshot(EntityType::Rental, 1).unwrap().is_none());
    }

    #[test]
    fn test_actor_directory() {
        let (_temp_dir, storage) = create_test_storage();
        let user = storage
            .users
            .insert_with(|id| Ok(User::new(id, "alice", "alice@example.com", "hash".into())))
            .unwrap();

        assert!(storage.actor_exists(user.id).unwrap());
        assert!(!storage.actor_exists(UserId::new(42)).unwrap());
        assert_eq!(storage.actor_name(user.id).unwrap().as_deref(), Some("alice"));
    }
}
