//! CSV export of the action history

use std::io::Write;

use crate::audit::HistoryFilter;
use crate::error::{FleetError, FleetResult};
use crate::services::HistoryService;
use crate::storage::Storage;

const HEADER: [&str; 7] = [
    "id",
    "timestamp",
    "actor",
    "action",
    "entity_type",
    "entity_id",
    "changes",
];

/// Export history records matching `filter`, newest first
pub fn export_history_csv<W: Write>(
    storage: &Storage,
    filter: &HistoryFilter,
    writer: W,
) -> FleetResult<usize> {
    let views = HistoryService::new(storage).list_views(filter)?;
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .map_err(|e| FleetError::Export(e.to_string()))?;

    for view in &views {
        let changes = serde_json::to_string(&view.changes)?;
        csv_writer
            .write_record([
                view.id.to_string(),
                view.timestamp.clone(),
                view.actor.clone(),
                view.action_kind.as_str().to_string(),
                view.entity_type.as_str().to_string(),
                view.entity_id.to_string(),
                changes,
            ])
            .map_err(|e| FleetError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| FleetError::Export(e.to_string()))?;

    Ok(views.len())
}
