//! JSON export of the action history

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{HistoryEntryView, HistoryFilter};
use crate::error::{FleetError, FleetResult};
use crate::services::HistoryService;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// History export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub record_count: usize,

    /// Entries, newest first
    pub entries: Vec<HistoryEntryView>,
}

impl HistoryExport {
    pub fn from_storage(storage: &Storage, filter: &HistoryFilter) -> FleetResult<Self> {
        let entries = HistoryService::new(storage).list_views(filter)?;

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            record_count: entries.len(),
            entries,
        })
    }
}

/// Export history as pretty-printed JSON
pub fn export_history_json<W: Write>(
    storage: &Storage,
    filter: &HistoryFilter,
    writer: &mut W,
) -> FleetResult<usize> {
    let export = HistoryExport::from_storage(storage, filter)?;

    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| FleetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FleetError::Export(e.to_string()))?;

    Ok(export.record_count)
}
