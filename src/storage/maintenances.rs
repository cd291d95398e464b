//! Maintenance repository

use crate::error::FleetResult;
use crate::models::{Maintenance, MaintenanceId, MaintenanceStatus, VehicleId};

use super::table::{Record, Table};

impl Record for Maintenance {
    type Id = MaintenanceId;

    fn id(&self) -> MaintenanceId {
        self.id
    }
}

pub type MaintenanceRepository = Table<Maintenance>;

impl Table<Maintenance> {
    /// All maintenance ordered by date, newest first
    pub fn all_by_date(&self) -> FleetResult<Vec<Maintenance>> {
        let mut rows = self.all()?;
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    pub fn for_vehicle(&self, vehicle_id: VehicleId) -> FleetResult<Vec<Maintenance>> {
        let mut rows = self.filter(|m| m.vehicle_id == vehicle_id)?;
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    pub fn count_with_status(&self, status: MaintenanceStatus) -> FleetResult<usize> {
        Ok(self.filter(|m| m.status == status)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMaintenance;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn add(repo: &MaintenanceRepository, vehicle: u64, days: i64, status: MaintenanceStatus) {
        repo.insert_with(|id| {
            Ok(Maintenance::from_new(
                id,
                NewMaintenance {
                    vehicle_id: VehicleId::new(vehicle),
                    kind: "Oil Change".into(),
                    description: None,
                    date: Utc::now() + Duration::days(days),
                    status: Some(status),
                },
            ))
        })
        .unwrap();
    }

    #[test]
    fn test_ordering_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let repo = MaintenanceRepository::new(temp_dir.path().join("maintenances.json"));
        repo.load().unwrap();

        add(&repo, 1, 1, MaintenanceStatus::Scheduled);
        add(&repo, 1, 5, MaintenanceStatus::Completed);
        add(&repo, 2, 3, MaintenanceStatus::Scheduled);

        let ordered: Vec<u64> = repo.all_by_date().unwrap().iter().map(|m| m.id.get()).collect();
        assert_eq!(ordered, vec![2, 3, 1]);

        assert_eq!(repo.for_vehicle(VehicleId::new(1)).unwrap().len(), 2);
        assert_eq!(repo.count_with_status(MaintenanceStatus::Scheduled).unwrap(), 2);
    }
}
