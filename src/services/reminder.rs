//! Reminder service
//!
//! Reminders are not part of the action history.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{FleetError, FleetResult};
use crate::models::{Reminder, ReminderId, ReminderStatus, VehicleId};
use crate::storage::Storage;

pub struct ReminderService<'a> {
    storage: &'a Storage,
}

impl<'a> ReminderService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Pending reminders, soonest due first
    pub fn list_pending(&self) -> FleetResult<Vec<Reminder>> {
        self.storage.reminders.pending()
    }

    pub fn list_all(&self) -> FleetResult<Vec<Reminder>> {
        self.storage.reminders.all()
    }

    pub fn create(
        &self,
        vehicle_id: VehicleId,
        kind: &str,
        description: Option<String>,
        due_date: DateTime<Utc>,
    ) -> FleetResult<Reminder> {
        if kind.trim().is_empty() {
            return Err(FleetError::Validation("Reminder type is required".into()));
        }
        if !self.storage.vehicles.exists(vehicle_id)? {
            return Err(FleetError::vehicle_not_found(vehicle_id.to_string()));
        }

        let reminder = self
            .storage
            .reminders
            .insert_with(|id| Ok(Reminder::new(id, vehicle_id, kind, description, due_date)))?;
        self.storage.reminders.save()?;

        info!(reminder = %reminder.id, vehicle = %vehicle_id, "reminder created");
        Ok(reminder)
    }

    /// Mark a reminder as done
    pub fn complete(&self, id: ReminderId) -> FleetResult<Reminder> {
        let mut reminder = self
            .storage
            .reminders
            .get(id)?
            .ok_or_else(|| FleetError::reminder_not_found(id.to_string()))?;

        if reminder.status != ReminderStatus::Pending {
            return Err(FleetError::Conflict(format!(
                "Reminder {} is already {}",
                id, reminder.status
            )));
        }

        reminder.status = ReminderStatus::Completed;
        self.storage.reminders.upsert(reminder.clone())?;
        self.storage.reminders.save()?;
        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{add_vehicle, create_test_storage};
    use chrono::Duration;

    #[test]
    fn test_pending_ordered_and_complete() {
        let (_temp, storage) = create_test_storage();
        let vehicle = add_vehicle(&storage, "ABC123");
        let service = ReminderService::new(&storage);
        let now = Utc::now();

        let later = service
            .create(vehicle, "insurance", None, now + Duration::days(10))
            .unwrap();
        let sooner = service
            .create(vehicle, "cleaning", None, now + Duration::days(1))
            .unwrap();

        let pending = service.list_pending().unwrap();
        assert_eq!(pending[0].id, sooner.id);

        service.complete(later.id).unwrap();
        assert_eq!(service.list_pending().unwrap().len(), 1);
        assert_eq!(service.list_all().unwrap().len(), 2);
        assert!(matches!(
            service.complete(later.id).unwrap_err(),
            FleetError::Conflict(_)
        ));
    }
}
