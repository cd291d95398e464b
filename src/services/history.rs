//! History service
//!
//! Read side of the action history. Listing is global; clearing only
//! removes the caller's own records unless a full purge is asked for.

use std::collections::HashMap;

use tracing::info;

use crate::audit::{ChangeLedger, ChangeRecord, ClearScope, HistoryEntryView, HistoryFilter};
use crate::error::FleetResult;
use crate::models::UserId;
use crate::storage::Storage;

pub struct HistoryService<'a> {
    storage: &'a Storage,
}

impl<'a> HistoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Records matching the filter, newest first
    pub fn list(&self, filter: &HistoryFilter) -> FleetResult<Vec<ChangeRecord>> {
        self.storage.history.list(filter)
    }

    /// Listing views with actor names resolved
    pub fn list_views(&self, filter: &HistoryFilter) -> FleetResult<Vec<HistoryEntryView>> {
        let records = self.list(filter)?;
        self.views(&records)
    }

    pub fn views(&self, records: &[ChangeRecord]) -> FleetResult<Vec<HistoryEntryView>> {
        let names = self.actor_names(records)?;
        Ok(records
            .iter()
            .map(|r| {
                HistoryEntryView::from_record(r, names.get(&r.actor_id).and_then(|n| n.as_deref()))
            })
            .collect())
    }

    /// Username per actor id appearing in `records`
    pub fn actor_names(
        &self,
        records: &[ChangeRecord],
    ) -> FleetResult<HashMap<UserId, Option<String>>> {
        let mut names = HashMap::new();
        for record in records {
            if !names.contains_key(&record.actor_id) {
                names.insert(record.actor_id, self.storage.actor_name(record.actor_id)?);
            }
        }
        Ok(names)
    }

    /// Remove the actor's own records
    pub fn clear(&self, actor: UserId) -> FleetResult<usize> {
        let removed = self.storage.history.clear(ClearScope::Actor(actor))?;
        info!(actor = %actor, removed, "history cleared for actor");
        Ok(removed)
    }

    /// Remove every record, whoever wrote it
    pub fn purge_all(&self) -> FleetResult<usize> {
        self.storage.history.clear(ClearScope::All)
    }

    pub fn count(&self) -> FleetResult<usize> {
        self.storage.history.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{ActionKind, EntityType};
    use crate::models::VehicleStatus;
    use crate::services::testing::{add_user, add_vehicle, create_test_storage};
    use crate::services::VehicleService;

    #[test]
    fn test_list_is_global_and_clear_is_scoped() {
        let (_temp, storage) = create_test_storage();
        let alice = add_user(&storage, "alice");
        let bob = add_user(&storage, "bob");
        let vehicle = add_vehicle(&storage, "ABC123");
        let vehicles = VehicleService::new(&storage);
        vehicles.set_status(alice, vehicle, VehicleStatus::Rented).unwrap();
        vehicles.set_status(bob, vehicle, VehicleStatus::Available).unwrap();

        let service = HistoryService::new(&storage);
        assert_eq!(service.list(&HistoryFilter::new()).unwrap().len(), 2);

        assert_eq!(service.clear(alice).unwrap(), 1);
        let remaining = service.list(&HistoryFilter::new()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].actor_id, bob);

        assert_eq!(service.purge_all().unwrap(), 1);
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_views_resolve_actor_names() {
        let (_temp, storage) = create_test_storage();
        let alice = add_user(&storage, "alice");
        let vehicle = add_vehicle(&storage, "ABC123");
        VehicleService::new(&storage)
            .set_status(alice, vehicle, VehicleStatus::Rented)
            .unwrap();

        let views = HistoryService::new(&storage)
            .list_views(&HistoryFilter::new().entity_type(EntityType::Vehicle))
            .unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].actor, "alice");
        assert_eq!(views[0].action_kind, ActionKind::Update);
        assert_eq!(views[0].changes["status"]["new"], "rented");
    }
}
