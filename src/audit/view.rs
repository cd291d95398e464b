//! Listing representation of change records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::{ActionKind, ChangeRecord, EntityType};

/// One history entry as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryView {
    pub id: u64,
    /// Username, or `#<id>` when the user is gone
    pub actor: String,
    pub action_kind: ActionKind,
    pub entity_type: EntityType,
    pub entity_id: u64,
    pub changes: Value,
    /// RFC 3339
    pub timestamp: String,
}

impl HistoryEntryView {
    pub fn from_record(record: &ChangeRecord, actor_name: Option<&str>) -> Self {
        Self {
            id: record.id.get(),
            actor: actor_name
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", record.actor_id)),
            action_kind: record.action,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            changes: record.changes.clone(),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}
