//! Dashboard service
//!
//! Fleet-wide counters for the overview screen.

use chrono::Utc;

use crate::error::FleetResult;
use crate::models::{MaintenanceStatus, RentalStatus, VehicleStatus};
use crate::storage::Storage;

/// Snapshot of fleet activity
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_vehicles: usize,
    /// Vehicle count per status, in status order
    pub by_status: Vec<(VehicleStatus, usize)>,
    pub active_rentals: usize,
    pub scheduled_maintenances: usize,
    pub pending_reminders: usize,
    pub overdue_reminders: usize,
}

impl DashboardStats {
    pub fn count(&self, status: VehicleStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }
}

pub struct DashboardService<'a> {
    storage: &'a Storage,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn stats(&self) -> FleetResult<DashboardStats> {
        let vehicles = self.storage.vehicles.all()?;
        let by_status = VehicleStatus::all()
            .iter()
            .map(|status| (*status, vehicles.iter().filter(|v| v.status == *status).count()))
            .collect();

        let now = Utc::now();
        let pending = self.storage.reminders.pending()?;

        Ok(DashboardStats {
            total_vehicles: vehicles.len(),
            by_status,
            active_rentals: self
                .storage
                .rentals
                .filter(|r| r.status == RentalStatus::Active)?
                .len(),
            scheduled_maintenances: self
                .storage
                .maintenances
                .count_with_status(MaintenanceStatus::Scheduled)?,
            pending_reminders: pending.len(),
            overdue_reminders: pending.iter().filter(|r| r.is_overdue(now)).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FleetPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    #[test]
    fn test_stats_on_demo_fleet() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FleetPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths, true).unwrap();

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let stats = DashboardService::new(&storage).stats().unwrap();

        assert_eq!(stats.total_vehicles, 5);
        assert_eq!(stats.count(VehicleStatus::Available), 1);
        assert_eq!(stats.count(VehicleStatus::NeedsCleaning), 1);
        assert_eq!(stats.active_rentals, 1);
        assert_eq!(stats.scheduled_maintenances, 2);
        assert_eq!(stats.pending_reminders, 2);
        assert_eq!(stats.overdue_reminders, 0);
    }
}
